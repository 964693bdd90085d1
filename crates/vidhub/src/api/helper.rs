use crate::api::error::InnerApiError;
use crate::upstream::UpstreamError;

/// 把外部服务的错误转换为接口错误：明确不存在的返回 404，其余均视为上游故障
pub fn upstream_error(context: &str, err: anyhow::Error) -> InnerApiError {
    if let Some(UpstreamError::NotFound(what)) = err.downcast_ref::<UpstreamError>() {
        return InnerApiError::NotFound(what.clone());
    }
    warn!("{}失败：{:#}", context, err);
    InnerApiError::BadGateway(format!("{context}失败：{err:#}"))
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_upstream_error() {
        let not_found = upstream_error("获取豆瓣详情", UpstreamError::NotFound("豆瓣条目 1".to_owned()).into());
        assert!(matches!(not_found, InnerApiError::NotFound(_)));
        let gateway = upstream_error("网盘搜索", anyhow!("connection refused"));
        assert!(matches!(gateway, InnerApiError::BadGateway(msg) if msg.contains("connection refused")));
    }
}
