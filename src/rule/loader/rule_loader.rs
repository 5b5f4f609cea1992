use std::fs;
use std::path::Path;

use filterline_engine::markup::{record_from_json_slice, MarkupParser, Record};
use filterline_engine::{CompiledRuleSet, RuleSetCompiler};

use crate::error::{FilterLineError, FlResult};
use crate::rule::loader::{ConfigFormat, ConfigPathManager};
use crate::FilterConfig;

/// 规则加载器：定位 → 解码 → 编译
#[derive(Debug, Default)]
pub struct RuleLoader {
    path_manager: ConfigPathManager,
}

impl RuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按配置加载并编译规则集
    pub fn load(&self, config: &FilterConfig) -> FlResult<CompiledRuleSet> {
        let path = self.path_manager.locate(config)?;
        self.load_path(&path)
    }

    /// 加载并编译指定文件
    pub fn load_path(&self, path: &Path) -> FlResult<CompiledRuleSet> {
        let record = self.load_record(path)?;
        let rule_set = RuleSetCompiler::compile(&record)?;
        log::info!(
            "Loaded {} rules from {} (type={})",
            rule_set.rule_count(),
            path.display(),
            rule_set.kind()
        );
        Ok(rule_set)
    }

    /// 只解码不编译
    pub fn load_record(&self, path: &Path) -> FlResult<Record> {
        if !path.is_file() {
            return Err(FilterLineError::ConfigNotFound(path.to_path_buf()));
        }
        let record = match ConfigFormat::from_path(path) {
            ConfigFormat::Json => record_from_json_slice(&fs::read(path)?)?,
            ConfigFormat::Markup => MarkupParser::parse_file(path)?,
        };
        Ok(record)
    }

    /// 异步加载（async-io 特性）
    #[cfg(feature = "async-io")]
    pub async fn load_async(&self, config: &FilterConfig) -> FlResult<CompiledRuleSet> {
        let path = self.path_manager.locate(config)?;
        let bytes = tokio::fs::read(&path).await?;
        let record = match ConfigFormat::from_path(&path) {
            ConfigFormat::Json => record_from_json_slice(&bytes)?,
            ConfigFormat::Markup => {
                let text = String::from_utf8(bytes).map_err(|e| {
                    std::io::Error::new(std::io::ErrorKind::InvalidData, e)
                })?;
                MarkupParser::parse_str(&text)
            }
        };
        Ok(RuleSetCompiler::compile(&record)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filterline_engine::error::{ConfigError, CoreError};
    use filterline_engine::RuleSetKind;

    const MARKUP: &str = "type:general\nprefix:^(\\d+)\nrules:\n[\nsrc:^start\nflag:S\n-\nsrc:^err (\\w+)\ndest:E\n]";
    const JSON: &str = r#"{"type":"general","prefix":"^(\\d+)","rules":[{"src":"^start","flag":"S"},{"src":"^err (\\w+)","dest":"E"}]}"#;

    #[test]
    fn test_markup_and_json_load_to_same_record() {
        let dir = tempfile::tempdir().unwrap();
        let markup = dir.path().join("rules.eoml");
        let json = dir.path().join("rules.json");
        fs::write(&markup, MARKUP).unwrap();
        fs::write(&json, JSON).unwrap();

        let loader = RuleLoader::new();
        assert_eq!(loader.load_record(&markup).unwrap(), loader.load_record(&json).unwrap());

        let set = loader.load_path(&json).unwrap();
        assert_eq!(set.kind(), RuleSetKind::General);
        assert_eq!(set.rule_count(), 2);
    }

    #[test]
    fn test_load_discovers_config() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join(".vscode");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("filterline.json"), r#"{"type":"stringlist","rules":["ERROR"]}"#).unwrap();

        let set = RuleLoader::new().load(&FilterConfig::discover(root.path())).unwrap();
        assert_eq!(set.kind(), RuleSetKind::StringList);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RuleLoader::new().load_path(&dir.path().join("none.txt")).unwrap_err();
        assert!(matches!(err, FilterLineError::ConfigNotFound(_)));
    }

    #[test]
    fn test_load_reports_compile_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, "type:nope\nrules:\n[\na\n]").unwrap();
        let err = RuleLoader::new().load_path(&path).unwrap_err();
        assert!(matches!(
            err,
            FilterLineError::Core(CoreError::Config(ConfigError::UnsupportedKind(_)))
        ));
    }

    #[test]
    fn test_load_reports_json_syntax_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{\"rules\": [").unwrap();
        let err = RuleLoader::new().load_path(&path).unwrap_err();
        assert!(matches!(err, FilterLineError::Core(CoreError::Json(_))));
    }

    #[cfg(feature = "async-io")]
    #[tokio::test]
    async fn test_load_async_matches_sync() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.txt");
        fs::write(&path, MARKUP).unwrap();
        let config = FilterConfig::local_file(&path);
        let set = RuleLoader::new().load_async(&config).await.unwrap();
        assert_eq!(set.kind(), RuleSetKind::General);
        assert_eq!(set.rule_count(), 2);
    }
}
