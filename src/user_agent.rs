//! Shared User-Agent string for manifest and track requests.

/// Default User-Agent for every request the client makes (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("playlist-downloader/{version}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_agent_identifies_tool_and_version() {
        let ua = default_user_agent();
        assert_eq!(ua, format!("playlist-downloader/{}", env!("CARGO_PKG_VERSION")));
    }
}
