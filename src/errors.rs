use thiserror::Error;

/// A fetched record that is missing a field the ranking needs, or carries
/// a value it cannot use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    #[error("roster: missing `{field}`")]
    Roster { field: &'static str },

    #[error("roster member #{index}: missing `{field}`")]
    Member { index: usize, field: &'static str },

    #[error("war record #{index}: missing `{field}`")]
    War { index: usize, field: &'static str },

    #[error("season {season}, participant {participant}: missing `{field}`")]
    Participant {
        season: i64,
        participant: String,
        field: &'static str,
    },

    #[error("season {season}, participant {participant}: `{field}` is negative ({value})")]
    Negative {
        season: i64,
        participant: String,
        field: &'static str,
        value: i64,
    },
}

/// Failure of one of the two remote fetches. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("could not decode payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed payload: {0}")]
    Malformed(#[from] MalformedRecord),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no clan tag configured (set `clan_tag`, CLAN_TAG or --clan)")]
    MissingClanTag,

    #[error("invalid clan tag `{0}`")]
    InvalidClanTag(String),

    #[error("CLAN_API_TOKEN is not set")]
    MissingToken,

    #[error("unknown season order `{0}` (expected first_seen, newest_first or oldest_first)")]
    UnknownSeasonOrder(String),
}
