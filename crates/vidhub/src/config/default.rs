use rand::seq::IndexedRandom;

/// 默认的 auth_token 实现，生成随机 16 位字符串
pub(super) fn default_auth_token() -> String {
    let byte_choices = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+-=";
    let mut rng = rand::rng();
    (0..16)
        .map(|_| *(byte_choices.choose(&mut rng).expect("choose byte failed")) as char)
        .collect()
}

pub(super) fn default_bind_address() -> String {
    "0.0.0.0:3000".to_owned()
}

pub(super) fn default_site_name() -> String {
    "VidHub".to_owned()
}

pub(super) fn default_blocked_words() -> Vec<String> {
    ["伦理片", "福利", "里番动漫", "门事件", "萝莉少女", "制服诱惑", "国产传媒", "cosplay", "黑丝诱惑", "无码", "有码"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

pub(super) fn default_dandanplay_endpoints() -> Vec<String> {
    vec![
        "https://api.dandanplay.net".to_owned(),
        "http://api.dandanplay.net".to_owned(),
    ]
}

pub(super) fn default_ai_system_prompt() -> String {
    "你是一个影视推荐助手。根据用户的喜好推荐电影、剧集或动漫，\
     每部作品的名称请使用《》包裹，并附上一句简短的推荐理由。"
        .to_owned()
}
