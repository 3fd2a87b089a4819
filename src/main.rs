use anyhow::Result;
use panorama_client::error::ConfigError;
use panorama_client::utils::logging;
use panorama_client::{App, Config, RequestState};
use std::path::PathBuf;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    // 读取两张图片路径
    let mut args = std::env::args().skip(1);
    let image1 = args.next().map(PathBuf::from).ok_or(ConfigError::MissingArgument {
        name: "image1".to_string(),
    })?;
    let image2 = args.next().map(PathBuf::from).ok_or(ConfigError::MissingArgument {
        name: "image2".to_string(),
    })?;

    // 初始化并运行应用
    let state = App::initialize(config, image1, image2).await?.run().await?;

    if state != RequestState::Succeeded {
        anyhow::bail!("拼接未成功 (状态: {})", state);
    }

    Ok(())
}
