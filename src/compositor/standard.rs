use super::{CompositeReport, CompositorBackend};
use crate::core::{OutputFormat, ProcessingError, ProcessingResult, WorkItem};
use crate::image_loader::ImageLoader;
use anyhow::Context;
use async_trait::async_trait;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GrayImage, ImageEncoder, Rgba, RgbImage, RgbaImage};
use std::io::{Cursor, Write};
use std::path::Path;
use std::time::Instant;
use tiff::encoder::{colortype, compression::Lzw, TiffEncoder};

/// マスクがない場合のアルファ値（完全不透明）
const OPAQUE: u8 = u8::MAX;

/// `image` クレートによる標準的な合成実装
#[derive(Clone, Debug, Default)]
pub struct StandardCompositor;

impl StandardCompositor {
    /// 新しい標準合成器を作成
    pub fn new() -> Self {
        Self
    }

    /// 同期版の合成処理。ブロッキングスレッド上で実行する
    pub fn composite_blocking(
        item: &WorkItem,
        format: OutputFormat,
    ) -> ProcessingResult<CompositeReport> {
        let start_time = Instant::now();

        let color = ImageLoader::load_rgb(&item.image_path)?;
        let mask = if item.mask_path.exists() {
            Some(ImageLoader::load_luma(&item.mask_path)?)
        } else {
            None
        };

        let rgba = Self::compose_rgba(&color, mask.as_ref(), &item.mask_path)?;

        // エンコードが終わるまで出力ファイルは作らない
        let bytes = Self::encode(&rgba, format)
            .map_err(|e| ProcessingError::encode(&item.output_path, e))?;
        Self::write_atomically(&item.output_path, &bytes)?;

        Ok(CompositeReport {
            dimensions: rgba.dimensions(),
            mask_applied: mask.is_some(),
            bytes_written: bytes.len() as u64,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    /// 同じディレクトリの一時ファイルに書いてから rename で置き換える
    ///
    /// 出力先が同じアイテムが並行しても、最後に rename した方の完全なファイルが残る。
    pub fn write_atomically(output_path: &Path, bytes: &[u8]) -> ProcessingResult<()> {
        let directory = match output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp_file = tempfile::NamedTempFile::new_in(directory)
            .map_err(|e| ProcessingError::io(output_path, e))?;
        temp_file
            .write_all(bytes)
            .map_err(|e| ProcessingError::io(output_path, e))?;
        temp_file
            .persist(output_path)
            .map_err(|e| ProcessingError::io(output_path, e.error))?;
        Ok(())
    }

    /// カラー画像とアルファを1枚のRGBA画像にまとめる
    pub fn compose_rgba(
        color: &RgbImage,
        mask: Option<&GrayImage>,
        mask_path: &Path,
    ) -> ProcessingResult<RgbaImage> {
        if let Some(mask) = mask {
            if mask.dimensions() != color.dimensions() {
                return Err(ProcessingError::dimension_mismatch(
                    mask_path,
                    color.dimensions(),
                    mask.dimensions(),
                ));
            }
        }

        let (width, height) = color.dimensions();
        Ok(RgbaImage::from_fn(width, height, |x, y| {
            let [r, g, b] = color.get_pixel(x, y).0;
            let alpha = mask.map_or(OPAQUE, |m| m.get_pixel(x, y).0[0]);
            Rgba([r, g, b, alpha])
        }))
    }

    /// 指定フォーマットでメモリ上にエンコードする
    pub fn encode(rgba: &RgbaImage, format: OutputFormat) -> anyhow::Result<Vec<u8>> {
        let (width, height) = rgba.dimensions();

        match format {
            OutputFormat::Png => {
                let mut buffer = Vec::new();
                PngEncoder::new(&mut buffer)
                    .write_image(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
                    .context("Failed to encode PNG")?;
                Ok(buffer)
            }
            OutputFormat::Tiff => {
                let mut cursor = Cursor::new(Vec::new());
                {
                    let mut encoder =
                        TiffEncoder::new(&mut cursor).context("Failed to create TIFF encoder")?;
                    encoder
                        .write_image_with_compression::<colortype::RGBA8, _>(
                            width,
                            height,
                            Lzw::default(),
                            rgba.as_raw(),
                        )
                        .context("Failed to encode LZW TIFF")?;
                }
                Ok(cursor.into_inner())
            }
        }
    }
}

#[async_trait]
impl CompositorBackend for StandardCompositor {
    async fn composite(
        &self,
        item: &WorkItem,
        format: OutputFormat,
    ) -> ProcessingResult<CompositeReport> {
        tokio::task::spawn_blocking({
            let item = item.clone();
            move || Self::composite_blocking(&item, format)
        })
        .await
        .map_err(ProcessingError::task)?
    }

    fn strategy_name(&self) -> &'static str {
        "Standard"
    }
}
