//! 全局过滤配置管理

use std::path::PathBuf;

/// 配置目录（相对项目根目录）
pub const CONFIG_DIR: &str = ".vscode";
/// 配置文件名（不含扩展名）
pub const CONFIG_STEM: &str = "filterline";
/// 结构化文本配置的候选扩展名，按顺序查找
pub const MARKUP_EXTENSIONS: [&str; 2] = ["eoml", "txt"];
/// 都不存在时回落到的 JSON 扩展名
pub const JSON_EXTENSION: &str = "json";
/// 默认输出文件标记
pub const DEFAULT_OUTPUT_MARKER: &str = ".filterline";

/// 规则配置来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    Discover(PathBuf),  // 在项目根目录的 .vscode 下查找
    LocalFile(PathBuf), // 指定的配置文件
}

/// 输出选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// 插在扩展名前的输出标记，输入路径已包含 `标记+扩展名` 时进入覆盖模式
    pub marker: String,
    /// 显式输出路径，设置后不再按输入路径推导
    pub output_path: Option<PathBuf>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_OUTPUT_MARKER.to_string(),
            output_path: None,
        }
    }
}

/// 完整过滤配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    pub origin: ConfigOrigin,
    pub output: OutputOptions,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            origin: ConfigOrigin::Discover(PathBuf::from(".")),
            output: OutputOptions::default(),
        }
    }
}

impl FilterConfig {
    /// 在项目根目录下查找配置
    pub fn discover(project_root: impl Into<PathBuf>) -> Self {
        Self {
            origin: ConfigOrigin::Discover(project_root.into()),
            ..Self::default()
        }
    }

    /// 指定配置文件
    pub fn local_file(path: impl Into<PathBuf>) -> Self {
        Self {
            origin: ConfigOrigin::LocalFile(path.into()),
            ..Self::default()
        }
    }

    /// 按顺序返回候选配置文件路径
    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        match &self.origin {
            ConfigOrigin::LocalFile(path) => vec![path.clone()],
            ConfigOrigin::Discover(root) => {
                let dir = root.join(CONFIG_DIR);
                MARKUP_EXTENSIONS
                    .iter()
                    .chain(std::iter::once(&JSON_EXTENSION))
                    .map(|ext| dir.join(format!("{}.{}", CONFIG_STEM, ext)))
                    .collect()
            }
        }
    }
}

/// 自定义构建器（链式 API）
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: FilterConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(mut self, origin: ConfigOrigin) -> Self {
        self.config.origin = origin;
        self
    }

    pub fn project_root(self, root: impl Into<PathBuf>) -> Self {
        self.origin(ConfigOrigin::Discover(root.into()))
    }

    pub fn config_file(self, path: impl Into<PathBuf>) -> Self {
        self.origin(ConfigOrigin::LocalFile(path.into()))
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.config.output.marker = marker.into();
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output.output_path = Some(path.into());
        self
    }

    pub fn build(mut self) -> FilterConfig {
        // 空标记会让输出路径与输入路径相同，回落到默认值
        if self.config.output.marker.is_empty() {
            log::warn!("Empty output marker, fall back to {}", DEFAULT_OUTPUT_MARKER);
            self.config.output.marker = DEFAULT_OUTPUT_MARKER.to_string();
        }
        self.config
    }
}
