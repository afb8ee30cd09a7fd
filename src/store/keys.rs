use crate::agent::params::GameKind;

pub fn player_key(player_name: &str) -> String {
    player_name.to_string()
}

pub fn game_session_key(session_id: &str) -> String {
    session_id.to_string()
}

/// Reverse-timestamp key so a forward prefix scan yields newest first.
pub fn learning_event_key(game: GameKind, timestamp_ms: i64, event_id: &str) -> String {
    let ts = timestamp_ms.max(0) as u64;
    let reverse_ts = u64::MAX - ts;
    format!("{}:{:020}:{}", game.as_str(), reverse_ts, event_id)
}

pub fn learning_event_prefix(game: GameKind) -> String {
    format!("{}:", game.as_str())
}

pub fn leaderboard_key(game: GameKind, player_name: &str) -> String {
    format!("{}:{}", game.as_str(), player_name)
}

pub fn leaderboard_prefix(game: GameKind) -> String {
    format!("{}:", game.as_str())
}

pub fn ai_metric_key(game: GameKind, timestamp_ms: i64) -> String {
    let ts = timestamp_ms.max(0) as u64;
    let reverse_ts = u64::MAX - ts;
    format!("{}:{:020}", game.as_str(), reverse_ts)
}

pub fn ai_metric_prefix(game: GameKind) -> String {
    format!("{}:", game.as_str())
}

/// Recovers the original timestamp (ms) from a reverse-timestamp key of
/// the form `{game}:{reverse_ts:020}` or `{game}:{reverse_ts:020}:{id}`.
pub fn parse_reverse_timestamp_ms(key: &[u8]) -> Option<i64> {
    let first_sep = key.iter().position(|b| *b == b':')?;
    let tail = &key[first_sep + 1..];
    let digits = match tail.iter().position(|b| *b == b':') {
        Some(second_sep) => &tail[..second_sep],
        None => tail,
    };
    let reverse_ts = std::str::from_utf8(digits).ok()?.parse::<u64>().ok()?;
    let ts = u64::MAX.checked_sub(reverse_ts)?;
    i64::try_from(ts).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_keys_order_newest_first() {
        let k_new = learning_event_key(GameKind::PingPong, 2000, "e2");
        let k_old = learning_event_key(GameKind::PingPong, 1000, "e1");
        assert!(k_new < k_old);
    }

    #[test]
    fn reverse_timestamp_roundtrips() {
        let key = ai_metric_key(GameKind::Tetris, 1_700_000_000_000);
        assert_eq!(
            parse_reverse_timestamp_ms(key.as_bytes()),
            Some(1_700_000_000_000)
        );
        let with_id = learning_event_key(GameKind::PingPong, 42, "abc");
        assert_eq!(parse_reverse_timestamp_ms(with_id.as_bytes()), Some(42));
    }
}
