/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 拼接服务地址（不含 /stitch 路径）
    pub stitch_api_base_url: String,
    /// 单次请求超时时间（秒）
    pub request_timeout_secs: u64,
    /// 算法参数 TOML 文件（可选）
    pub params_file: Option<String>,
    /// 拼接结果输出文件
    pub output_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stitch_api_base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 120,
            params_file: None,
            output_file: "stitched.jpg".to_string(),
            verbose_logging: false,
            output_log_file: "stitch_log.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            stitch_api_base_url: std::env::var("STITCH_API_BASE_URL").unwrap_or(default.stitch_api_base_url),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            params_file: std::env::var("STITCH_PARAMS_FILE").ok().filter(|v| !v.trim().is_empty()).or(default.params_file),
            output_file: std::env::var("OUTPUT_FILE").unwrap_or(default.output_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }

    /// 拼接接口完整地址
    pub fn stitch_endpoint(&self) -> String {
        format!("{}/stitch", self.stitch_api_base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stitch_endpoint_trims_trailing_slash() {
        let config = Config {
            stitch_api_base_url: "http://example.com:9000/api/".to_string(),
            ..Config::default()
        };
        assert_eq!(config.stitch_endpoint(), "http://example.com:9000/api/stitch");
        assert_eq!(
            Config::default().stitch_endpoint(),
            "http://127.0.0.1:8000/stitch"
        );
    }
}
