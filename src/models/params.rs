//! 拼接算法参数
//!
//! 八个数值参数原样转发给拼接服务，客户端不做范围校验，也不要求整数

use serde::{Deserialize, Serialize};

/// 拼接算法参数
///
/// 字段名在 TOML 与表单中均使用服务端的 camelCase 名称
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StitchParameters {
    /// 高斯平滑 sigma
    pub sigma: f64,
    /// Harris 角点阈值
    pub harris_thresh: f64,
    /// Harris 非极大值抑制半径
    pub harris_radius: f64,
    /// SIFT 描述子放大系数
    pub sift_enlarge: f64,
    /// 输入图片最长边（像素）
    pub max_size: f64,
    /// 最多保留的匹配数
    pub num_matches: f64,
    /// RANSAC 迭代次数
    pub ransac_iters: f64,
    /// RANSAC 内点阈值
    pub ransac_thresh: f64,
}

impl Default for StitchParameters {
    fn default() -> Self {
        Self {
            sigma: 2.0,
            harris_thresh: 3000.0,
            harris_radius: 3.0,
            sift_enlarge: 1.5,
            max_size: 1600.0,
            num_matches: 100.0,
            ransac_iters: 1000.0,
            ransac_thresh: 1.0,
        }
    }
}

impl StitchParameters {
    /// 表单字段列表（字段名, 十进制字符串）
    pub fn form_fields(&self) -> [(&'static str, String); 8] {
        [
            ("sigma", self.sigma.to_string()),
            ("harrisThresh", self.harris_thresh.to_string()),
            ("harrisRadius", self.harris_radius.to_string()),
            ("siftEnlarge", self.sift_enlarge.to_string()),
            ("maxSize", self.max_size.to_string()),
            ("numMatches", self.num_matches.to_string()),
            ("ransacIters", self.ransac_iters.to_string()),
            ("ransacThresh", self.ransac_thresh.to_string()),
        ]
    }
}
