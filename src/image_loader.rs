use crate::core::{ProcessingError, ProcessingResult};
use image::{DynamicImage, GrayImage, ImageReader, RgbImage};
use std::path::Path;

/// 合成入力の読み込み
///
/// ファイルを開けない場合はI/Oエラー、開けたが解釈できない場合はデコードエラーとして区別する。
pub struct ImageLoader;

impl ImageLoader {
    pub fn load_image(path: &Path) -> ProcessingResult<DynamicImage> {
        let reader = ImageReader::open(path).map_err(|e| ProcessingError::io(path, e))?;
        let reader = reader
            .with_guessed_format()
            .map_err(|e| ProcessingError::io(path, e))?;

        reader
            .decode()
            .map_err(|e| ProcessingError::decode(path, e))
    }

    /// 3チャンネルのカラー画像として読み込む
    pub fn load_rgb(path: &Path) -> ProcessingResult<RgbImage> {
        Ok(Self::load_image(path)?.into_rgb8())
    }

    /// 単一チャンネルの輝度画像として読み込む（マスク用）
    pub fn load_luma(path: &Path) -> ProcessingResult<GrayImage> {
        Ok(Self::load_image(path)?.into_luma8())
    }
}
