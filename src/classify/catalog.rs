//! Static catalog of documented service errors

use serde::Serialize;

/// A documented (status, type, message template, description) tuple.
///
/// The message template keeps the `{placeholder}` segments the service fills in
/// at runtime; matching against it is positional, see [`super::similarity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorDescriptor {
    pub code: u16,
    #[serde(rename = "type")]
    pub error_type: &'static str,
    pub message_template: &'static str,
    /// Localized (zh-CN) explanation
    pub description: &'static str,
}

const fn entry(
    code: u16,
    error_type: &'static str,
    message_template: &'static str,
    description: &'static str,
) -> ErrorDescriptor {
    ErrorDescriptor {
        code,
        error_type,
        message_template,
        description,
    }
}

static CATALOG: [ErrorDescriptor; 23] = [
    entry(400, "content_filter", "The request was rejected because it was considered high risk", "内容审查拒绝，您的输入或生成内容可能包含不安全或敏感内容，请您避免输入易产生敏感内容的提示语，谢谢"),
    entry(400, "invalid_request_error", "Invalid request: {error_details}", "请求无效，通常是您请求格式错误或者缺少必要参数，请检查后重试"),
    entry(400, "invalid_request_error", "Input token length too long", "请求中的 tokens 长度过长，请求不要超过模型 tokens 的最长限制"),
    entry(400, "invalid_request_error", "Your request exceeded model token limit : {max_model_length}", "请求的 tokens 数和设置的 max_tokens 加和超过了模型规格长度，请检查请求体的规格或选择合适长度的模型"),
    entry(400, "invalid_request_error", "Invalid purpose: only 'file-extract' accepted", "请求中的目的（purpose）不正确，当前只接受 'file-extract'，请修改后重新请求"),
    entry(400, "invalid_request_error", "File size is too large, max file size is 100MB, please confirm and re-upload the file", "上传的文件大小超过了限制，请重新上传"),
    entry(400, "invalid_request_error", "File size is zero, please confirm and re-upload the file", "上传的文件大小为 0，请重新上传"),
    entry(400, "invalid_request_error", "The number of files you have uploaded exceeded the max file count {max_file_count}, please delete previous uploaded files", "上传的文件总数超限，请删除不用的早期的文件后重新 上传"),
    entry(401, "invalid_authentication_error", "Invalid Authentication", "鉴权失败，请检查 apikey 是否正确，请修改后重试"),
    entry(401, "invalid_authentication_error", "Incorrect API key provided", "鉴权失败，请检查 apikey 是否提供以及 apikey 是否正确，请修改后重试"),
    entry(403, "exceeded_current_quota_error", "Your account {uid}<{ak-id}> is not active, current state: {current state}, you may consider to check your account balance", "账户异常，请检查您的账户余额"),
    entry(403, "permission_denied_error", "The API you are accessing is not open", "访问的 API 暂未开放"),
    entry(403, "permission_denied_error", "You are not allowed to get other user info", "访问其他用户信息的行为不被允许，请检查"),
    entry(404, "resource_not_found_error", "Not found the model or Permission denied", "不存在此模型或者没有授权访问此模型，请检查后重试"),
    entry(404, "resource_not_found_error", "Users {user_id} not found", "找不到该用户，请检查后重试"),
    entry(429, "engine_overloaded_error", "The engine is currently overloaded, please try again later", "当前并发请求过多，节点限流中，请稍后重试；建议充值升级 tier，享受更丝滑的体验"),
    entry(429, "exceeded_current_quota_error", "You exceeded your current token quota: {token_credit}, please check your account balance", "账户额度不足，请检查账户余额，保证账户余额可匹配您 tokens 的消耗费用后重试"),
    entry(429, "rate_limit_reached_error", "Your account {uid}<{ak-id}> request reached max concurrency: {Concurrency}, please try again after {time} seconds", "请求触发了账户并发个数的限制，请等待指定时间后重试"),
    entry(429, "rate_limit_reached_error", "Your account {uid}<{ak-id}> request reached max request: {RPM}, please try again after {time} seconds", "请求触发了账户 RPM 速率限制，请等待指定时间后重试"),
    entry(429, "rate_limit_reached_error", "Your account {uid}<{ak-id}> request reached TPM rate limit, current:{current_tpm}, limit:{max_tpm}", "请求触发了账户 TPM 速率限制，请等待指定时间后重试"),
    entry(429, "rate_limit_reached_error", "Your account {uid}<{ak-id}> request reached TPD rate limit,current:{current_tpd}, limit:{max_tpd}", "请求触发了账户 TPD 速率限制，请等待指定时间后重试"),
    entry(500, "server_error", "Failed to extract file: {error}", "解析文件失败，请重试"),
    entry(500, "unexpected_output", "invalid state transition", "内部错误，请联系管理员"),
];

/// All catalog entries, in declaration order.
///
/// Order matters: when two entries score the same, the earlier one wins.
pub fn entries() -> &'static [ErrorDescriptor] {
    &CATALOG
}
