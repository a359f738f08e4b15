use crate::core::{JobConfig, ProcessingError, ProcessingResult, WorkItem};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// マスク画像の拡張子。マスクは常に `<元画像のベース名>.png`
const MASK_EXTENSION: &str = "png";

pub struct FileScanner;

impl FileScanner {
    /// ディレクトリ直下の画像ファイルをファイル名順で列挙する（サブディレクトリは対象外）
    pub fn scan_directory(directory: &Path) -> ProcessingResult<Vec<PathBuf>> {
        let mut file_paths = Vec::new();

        let walker = WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // ルートディレクトリ自体が読めない場合のみジョブ全体のエラー
                Err(error) if error.depth() == 0 => {
                    return Err(ProcessingError::io(directory, error.into()));
                }
                Err(error) => {
                    Self::handle_unreadable_entry(error, &mut file_paths);
                    continue;
                }
            };

            if entry.file_type().is_file() && Self::has_image_extension(entry.path()) {
                file_paths.push(entry.path().to_path_buf());
            }
        }

        Ok(file_paths)
    }

    // 読めないエントリでもバッチは止めない。
    // 画像の拡張子なら作業アイテムとして残し、合成時に Failure(Io) として記録させる
    fn handle_unreadable_entry(error: walkdir::Error, file_paths: &mut Vec<PathBuf>) {
        match error.path() {
            Some(path) if Self::has_image_extension(path) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %error,
                    "Unreadable input entry kept as a work item"
                );
                file_paths.push(path.to_path_buf());
            }
            _ => {
                tracing::warn!(error = %error, "Skipping unreadable directory entry");
            }
        }
    }

    fn has_image_extension(path: &Path) -> bool {
        path.extension()
            .map(|ext| Self::is_image_extension(&ext.to_string_lossy().to_lowercase()))
            .unwrap_or(false)
    }

    /// ジョブ設定から作業アイテムを構築する
    ///
    /// 対象画像が1枚もない場合は設定エラーとしてジョブを開始させない。
    pub fn build_work_items(config: &JobConfig) -> ProcessingResult<Vec<WorkItem>> {
        let images = Self::scan_directory(&config.input_dir)?;
        if images.is_empty() {
            return Err(ProcessingError::configuration(format!(
                "no eligible images: {}",
                config.input_dir.display()
            )));
        }

        let items: Vec<WorkItem> = images
            .into_iter()
            .enumerate()
            .filter_map(|(index, image_path)| Self::derive_item(index, image_path, config))
            .collect();

        Self::warn_on_output_collisions(&items);
        Ok(items)
    }

    fn derive_item(index: usize, image_path: PathBuf, config: &JobConfig) -> Option<WorkItem> {
        let stem = image_path.file_stem()?.to_os_string();
        let id = image_path.file_name()?.to_string_lossy().into_owned();

        Some(WorkItem {
            index,
            id,
            mask_path: config.mask_dir.join(with_extension(&stem, MASK_EXTENSION)),
            output_path: config
                .output_dir
                .join(with_extension(&stem, config.output_format.extension())),
            image_path,
        })
    }

    // a.jpg と a.png は同じ出力先になる。両方処理するが結果は後勝ち
    fn warn_on_output_collisions(items: &[WorkItem]) {
        let mut seen: HashMap<&Path, &str> = HashMap::new();
        for item in items {
            if let Some(previous) = seen.insert(&item.output_path, &item.id) {
                tracing::warn!(
                    first = previous,
                    second = %item.id,
                    output = %item.output_path.display(),
                    "Two inputs share the same output file name"
                );
            }
        }
    }

    fn is_image_extension(extension: &str) -> bool {
        matches!(extension, "jpg" | "jpeg" | "png" | "tif" | "tiff")
    }
}

fn with_extension(stem: &OsString, extension: &str) -> OsString {
    let mut name = stem.clone();
    name.push(".");
    name.push(extension);
    name
}
