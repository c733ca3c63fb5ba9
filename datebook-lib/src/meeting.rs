use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::Display as StrumDisplay;

/// Largest integer a JSON number survives a round trip through an IEEE double with.
const MAX_SAFE_ID: u64 = (1 << 53) - 1;

/// Identifier of a [`Meeting`]. Serialized as a plain JSON number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MeetingId(pub u64);

/// A committed meeting, as it is stored locally and exchanged with the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: MeetingId,
    pub name: String,
    #[serde(with = "iso_millis")]
    pub start_datetime: DateTime<Utc>,
    #[serde(with = "iso_millis")]
    pub end_datetime: DateTime<Utc>,
}

/// How a freshly created [`Meeting`] gets its [`MeetingId`].
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, StrumDisplay,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IdStrategy {
    /// A random id that isn't in use yet.
    #[default]
    Random,
    /// The number of meetings currently stored. Ids get reused after a delete and clash
    /// between sessions; only here for compatibility with data written that way.
    CollectionLength,
}

impl IdStrategy {
    pub fn next_id(&self, meetings: &[Meeting]) -> MeetingId {
        match self {
            IdStrategy::Random => {
                let mut rng = rand::rng();
                loop {
                    let id = MeetingId(rng.random_range(0..=MAX_SAFE_ID));
                    if meetings.iter().all(|m| m.id != id) {
                        return id;
                    }
                }
            }
            IdStrategy::CollectionLength => {
                MeetingId(u64::try_from(meetings.len()).unwrap_or(u64::MAX))
            }
        }
    }
}

/// Body of both the read response and the write request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub data: Vec<Meeting>,
}

/// `2024-03-04T09:00:00.000Z` on the way out, any RFC 3339 offset on the way in.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;

        DateTime::parse_from_rfc3339(&text)
            .map(|instant| instant.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_wire_format() {
        let meeting = Meeting {
            id: MeetingId(0),
            name: "Standup".into(),
            start_datetime: "2024-03-04T09:00:00Z".parse().unwrap(),
            end_datetime: "2024-03-04T09:15:00Z".parse().unwrap(),
        };

        assert_eq!(
            serde_json::to_value(Envelope {
                data: vec![meeting]
            })
            .unwrap(),
            json!({
                "data": [{
                    "id": 0,
                    "name": "Standup",
                    "startDatetime": "2024-03-04T09:00:00.000Z",
                    "endDatetime": "2024-03-04T09:15:00.000Z",
                }]
            })
        );
    }

    #[test]
    fn test_read_ignores_draft_fields_and_accepts_offsets() {
        let envelope: Envelope = serde_json::from_value(json!({
            "data": [{
                "id": 3,
                "name": "Retro",
                "startDatetime": "2024-03-04T10:00:00+01:00",
                "editStartDate": "04/03/2024 10:00",
                "endDatetime": "2024-03-04T10:30:00.000Z",
                "editEndDate": "04/03/2024 11:30",
            }]
        }))
        .unwrap();

        let meeting = envelope.data.first().unwrap();
        assert_eq!(meeting.id, MeetingId(3));
        assert_eq!(
            meeting.start_datetime,
            "2024-03-04T09:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    fn at(id: u64) -> Meeting {
        Meeting {
            id: MeetingId(id),
            name: "Any".into(),
            start_datetime: "2024-03-04T09:00:00Z".parse().unwrap(),
            end_datetime: "2024-03-04T09:15:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_collection_length_ids() {
        let strategy = IdStrategy::CollectionLength;

        assert_eq!(strategy.next_id(&[]), MeetingId(0));
        // Reuses an id that is still taken, like the scheme it mirrors
        assert_eq!(strategy.next_id(&[at(1)]), MeetingId(1));
        assert_eq!(strategy.next_id(&[at(0), at(1)]), MeetingId(2));
    }

    #[test]
    fn test_random_ids_avoid_existing() {
        let existing: Vec<Meeting> = (0..50).map(at).collect();

        for _ in 0..100 {
            let id = IdStrategy::Random.next_id(&existing);
            assert!(existing.iter().all(|m| m.id != id));
            assert!(id.0 <= MAX_SAFE_ID);
        }
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(IdStrategy::Random.to_string(), "random");
        assert_eq!(IdStrategy::CollectionLength.to_string(), "collection_length");
    }

    #[test]
    fn test_read_rejects_unparsable_instants() {
        let result = serde_json::from_value::<Envelope>(json!({
            "data": [{
                "id": 1,
                "name": "Broken",
                "startDatetime": "04/03/2024 10:00",
                "endDatetime": "2024-03-04T10:30:00.000Z",
            }]
        }));

        assert!(result.is_err());
    }
}
