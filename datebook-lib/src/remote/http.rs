use tracing::debug;
use url::Url;

use crate::{
    Error, Result,
    meeting::{Envelope, Meeting},
    remote::Remote,
};

/// [`Remote`] speaking JSON over HTTP to a single collection resource.
///
/// `GET` answers with `{ "data": [...] }` and `POST` takes the same envelope holding the
/// complete collection. Any non-2xx status is an error.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpRemote {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn parse(endpoint: &str) -> Result<Self> {
        Ok(Self::new(Url::parse(endpoint)?))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Remote for HttpRemote {
    async fn fetch_all(&self) -> Result<Vec<Meeting>> {
        debug!("GET {}", self.endpoint);

        let resp = self.http.get(self.endpoint.clone()).send().await?;

        if !resp.status().is_success() {
            return Err(Error::Status(resp.status()));
        }

        let envelope: Envelope = resp.json().await?;

        Ok(envelope.data)
    }

    async fn replace_all(&self, meetings: Vec<Meeting>) -> Result<()> {
        debug!("POST {} ({} meetings)", self.endpoint, meetings.len());

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&Envelope { data: meetings })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Error::Status(resp.status()));
        }

        Ok(())
    }
}
