/// 公共验证函数模块
/// 提供玩家名、会话 ID、结局标签等输入验证，供各游戏路由共用。

/// 验证玩家名格式：2-50 字符，只允许字母、数字、下划线、连字符和空格
pub fn validate_player_name(player_name: &str) -> Result<(), &'static str> {
    let char_count = player_name.chars().count();
    if char_count < 2 || char_count > 50 {
        return Err("玩家名长度需在2到50个字符之间");
    }
    if !player_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == ' ')
    {
        return Err("玩家名只能包含字母、数字、下划线、连字符和空格");
    }
    Ok(())
}

/// 验证会话 ID：非空、最多 64 字符，仅允许字母数字和连字符
pub fn validate_session_id(session_id: &str) -> Result<(), &'static str> {
    if session_id.is_empty() {
        return Err("会话 ID 不能为空");
    }
    if session_id.len() > 64 {
        return Err("会话 ID 长度不能超过64个字符");
    }
    if !session_id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-')
    {
        return Err("会话 ID 只能包含字母、数字和连字符");
    }
    Ok(())
}

/// 验证结局标签：非空、最多 64 字符。未知标签允许（按中性结果计）。
pub fn validate_outcome_label(outcome: &str) -> Result<(), &'static str> {
    if outcome.trim().is_empty() {
        return Err("结局标签不能为空");
    }
    if outcome.chars().count() > 64 {
        return Err("结局标签长度不能超过64个字符");
    }
    Ok(())
}
