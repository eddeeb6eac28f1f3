// 設定管理の具象実装

use crate::core::{OutputFormat, ProcessingConfig, ProcessingError, ProcessingResult};
use crate::detection::DetectorKind;
use std::path::PathBuf;

/// 既定の出力ディレクトリ
pub const DEFAULT_OUTPUT_DIR: &str = "results";

/// 既定の並列数の上限
const MAX_DEFAULT_CONCURRENCY: usize = 16;

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultProcessingConfig {
    max_concurrent: usize,
    batch_size: usize,
    output_dir: PathBuf,
    output_format: OutputFormat,
    primary: DetectorKind,
    comparison: DetectorKind,
    enable_progress: bool,
}

impl DefaultProcessingConfig {
    pub fn new(cpu_count: usize) -> Self {
        Self {
            max_concurrent: (cpu_count.max(1) * 2).min(MAX_DEFAULT_CONCURRENCY),
            ..Self::default()
        }
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_detectors(mut self, primary: DetectorKind, comparison: DetectorKind) -> Self {
        self.primary = primary;
        self.comparison = comparison;
        self
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }

    /// 設定値の検証
    pub fn validate(&self) -> ProcessingResult<()> {
        validate_config(self)
    }
}

impl Default for DefaultProcessingConfig {
    fn default() -> Self {
        Self {
            max_concurrent: (num_cpus::get().max(1) * 2).min(MAX_DEFAULT_CONCURRENCY),
            batch_size: 1,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_format: OutputFormat::default(),
            primary: DetectorKind::Manual,
            comparison: DetectorKind::Library,
            enable_progress: true,
        }
    }
}

impl ProcessingConfig for DefaultProcessingConfig {
    fn max_concurrent_tasks(&self) -> usize {
        self.max_concurrent
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn output_dir(&self) -> PathBuf {
        self.output_dir.clone()
    }

    fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    fn primary_detector(&self) -> DetectorKind {
        self.primary
    }

    fn comparison_detector(&self) -> DetectorKind {
        self.comparison
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }
}

/// 任意の設定実装を検証する
///
/// 同じ検出器を2つ選ぶと成果物のファイル名が衝突するため拒否する。
pub fn validate_config<C: ProcessingConfig + ?Sized>(config: &C) -> ProcessingResult<()> {
    if config.max_concurrent_tasks() == 0 {
        return Err(ProcessingError::configuration(
            "並列タスク数は1以上である必要があります",
        ));
    }

    if config.batch_size() == 0 {
        return Err(ProcessingError::configuration(
            "バッチサイズは1以上である必要があります",
        ));
    }

    if config.primary_detector() == config.comparison_detector() {
        return Err(ProcessingError::configuration(format!(
            "主検出器と比較検出器は異なる必要があります: {:?}",
            config.primary_detector()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{traits::MockProcessingConfig, ErrorCategory};

    #[test]
    fn test_default_processing_config() {
        let config = DefaultProcessingConfig::default();

        assert!(config.max_concurrent_tasks() > 0);
        assert!(config.max_concurrent_tasks() <= MAX_DEFAULT_CONCURRENCY);
        assert_eq!(config.batch_size(), 1);
        assert_eq!(config.output_dir(), PathBuf::from("results"));
        assert_eq!(config.output_format(), OutputFormat::Png);
        assert_eq!(config.primary_detector(), DetectorKind::Manual);
        assert_eq!(config.comparison_detector(), DetectorKind::Library);
        assert!(config.enable_progress_reporting());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_concurrency_from_cpu_count() {
        assert_eq!(DefaultProcessingConfig::new(2).max_concurrent_tasks(), 4);
        assert_eq!(DefaultProcessingConfig::new(0).max_concurrent_tasks(), 2);
        assert_eq!(DefaultProcessingConfig::new(64).max_concurrent_tasks(), 16);
    }

    #[test]
    fn test_processing_config_builder() {
        let config = DefaultProcessingConfig::new(4)
            .with_max_concurrent(3)
            .with_batch_size(10)
            .with_output_dir("out/edges")
            .with_output_format(OutputFormat::Jpeg)
            .with_detectors(DetectorKind::Library, DetectorKind::Manual)
            .with_progress_reporting(false);

        assert_eq!(config.max_concurrent_tasks(), 3);
        assert_eq!(config.batch_size(), 10);
        assert_eq!(config.output_dir(), PathBuf::from("out/edges"));
        assert_eq!(config.output_format(), OutputFormat::Jpeg);
        assert_eq!(config.primary_detector(), DetectorKind::Library);
        assert_eq!(config.comparison_detector(), DetectorKind::Manual);
        assert!(!config.enable_progress_reporting());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let zero_workers = DefaultProcessingConfig::default().with_max_concurrent(0);
        let error = zero_workers.validate().unwrap_err();
        assert!(matches!(error, ProcessingError::ConfigurationError { .. }));
        assert_eq!(error.category(), ErrorCategory::BatchFatal);

        let zero_batch = DefaultProcessingConfig::default().with_batch_size(0);
        assert!(zero_batch.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_identical_detectors() {
        let config = DefaultProcessingConfig::default()
            .with_detectors(DetectorKind::Manual, DetectorKind::Manual);

        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("Manual"));
    }

    #[test]
    fn test_validate_generic_config() {
        let mut mock_config = MockProcessingConfig::new();
        mock_config.expect_max_concurrent_tasks().return_const(1usize);
        mock_config.expect_batch_size().return_const(5usize);
        mock_config
            .expect_primary_detector()
            .return_const(DetectorKind::Manual);
        mock_config
            .expect_comparison_detector()
            .return_const(DetectorKind::Library);

        assert!(validate_config(&mock_config).is_ok());
    }
}
