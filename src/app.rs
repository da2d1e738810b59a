//! The eframe application — thin UI glue over [`BlockEditor`].
//!
//! Everything stateful about the picture lives in the editor; the app only
//! holds the text-box strings, the uploaded texture, and the status line.

use std::path::PathBuf;
use std::sync::Arc;

use eframe::egui;
use egui::{ColorImage, ImageData, TextureFilter, TextureOptions};
use rfd::FileDialog;

use crate::editor::BlockEditor;
use crate::io::EditorError;
use crate::{log_err, log_info};

/// Block size applied when a file is first opened, before the user rebins.
const DEFAULT_BLOCK_SIZE: u32 = 64;

pub struct BlockoutApp {
    editor: Option<BlockEditor>,
    /// File the current picture was loaded from, for the window title.
    source_path: Option<PathBuf>,

    /// Uploaded copy of the editor's working buffer.
    texture: Option<egui::TextureHandle>,
    /// Set whenever an editor operation mutated the working buffer.
    texture_stale: bool,

    // Text-box contents; parsed (and validated) only when a button is pressed
    block_size_input: String,
    count_input: String,

    /// Last error or info line, shown in the bottom status bar.
    status: String,
}

impl BlockoutApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            editor: None,
            source_path: None,
            texture: None,
            texture_stale: false,
            block_size_input: DEFAULT_BLOCK_SIZE.to_string(),
            count_input: "1".to_string(),
            status: "Open an image to begin.".to_string(),
        }
    }

    // ---- button handlers ----------------------------------------------------

    fn open_clicked(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter(
                "Images",
                &["png", "jpg", "jpeg", "webp", "bmp", "tga", "tif", "tiff"],
            )
            .pick_file()
        else {
            return;
        };

        let block_size = match self.parse_block_size() {
            Ok(b) => b,
            Err(e) => {
                self.report(&e);
                return;
            }
        };

        match BlockEditor::open(&path, block_size) {
            Ok(editor) => {
                log_info!(
                    "opened {} ({}×{}, {} blocks)",
                    path.display(),
                    editor.dimensions().0,
                    editor.dimensions().1,
                    editor.block_count()
                );
                self.status = format!(
                    "Loaded {} — {} blocks of {} px.",
                    path.display(),
                    editor.block_count(),
                    block_size
                );
                self.editor = Some(editor);
                self.source_path = Some(path);
                self.texture_stale = true;
            }
            Err(e) => self.report(&e),
        }
    }

    fn save_clicked(&mut self) {
        let Some(editor) = &self.editor else {
            self.status = "Nothing to save — open an image first.".to_string();
            return;
        };
        let Some(path) = FileDialog::new()
            .add_filter("PNG", &["png"])
            .add_filter("JPEG", &["jpg", "jpeg"])
            .add_filter("All images", &["png", "jpg", "jpeg", "webp", "bmp", "tga", "tif", "tiff"])
            .save_file()
        else {
            return;
        };

        match editor.save(&path) {
            Ok(()) => {
                log_info!("saved {}", path.display());
                self.status = format!("Saved {}.", path.display());
            }
            Err(e) => self.report(&e),
        }
    }

    fn rebin_clicked(&mut self) {
        let block_size = match self.parse_block_size() {
            Ok(b) => b,
            Err(e) => {
                self.report(&e);
                return;
            }
        };
        let Some(editor) = &mut self.editor else {
            self.status = "Open an image first.".to_string();
            return;
        };
        match editor.rebin(block_size) {
            Ok(()) => {
                self.status = format!(
                    "Rebinned to {} blocks of {} px; erasures discarded.",
                    editor.block_count(),
                    block_size
                );
                self.texture_stale = true;
            }
            Err(e) => self.report(&e),
        }
    }

    fn erase_clicked(&mut self) {
        let n = match self.parse_count() {
            Ok(n) => n,
            Err(e) => {
                self.report(&e);
                return;
            }
        };
        let Some(editor) = &mut self.editor else {
            self.status = "Open an image first.".to_string();
            return;
        };
        let done = editor.erase_n(n);
        self.status = if done < n {
            format!(
                "Erased {} blocks ({} requested; every block is now erased).",
                done, n
            )
        } else {
            format!("Erased {} blocks; {} active.", done, editor.active_count())
        };
        if done > 0 {
            self.texture_stale = true;
        }
    }

    fn restore_clicked(&mut self) {
        let n = match self.parse_count() {
            Ok(n) => n,
            Err(e) => {
                self.report(&e);
                return;
            }
        };
        let Some(editor) = &mut self.editor else {
            self.status = "Open an image first.".to_string();
            return;
        };
        let done = editor.restore_n(n);
        self.status = if done < n {
            format!(
                "Restored {} blocks ({} requested; nothing left to restore).",
                done, n
            )
        } else {
            format!(
                "Restored {} blocks; {} erased remain.",
                done,
                editor.erased_count()
            )
        };
        if done > 0 {
            self.texture_stale = true;
        }
    }

    // ---- input parsing ------------------------------------------------------

    fn parse_block_size(&self) -> Result<u32, EditorError> {
        match self.block_size_input.trim().parse::<u32>() {
            Ok(b) if b > 0 => Ok(b),
            _ => Err(EditorError::InvalidArgument(format!(
                "block size must be a positive integer, got '{}'",
                self.block_size_input.trim()
            ))),
        }
    }

    fn parse_count(&self) -> Result<usize, EditorError> {
        self.count_input.trim().parse::<usize>().map_err(|_| {
            EditorError::InvalidArgument(format!(
                "block count must be a non-negative integer, got '{}'",
                self.count_input.trim()
            ))
        })
    }

    fn report(&mut self, e: &EditorError) {
        log_err!("{}", e);
        self.status = e.to_string();
    }

    // ---- rendering ----------------------------------------------------------

    /// Re-upload the working buffer as an egui texture when it changed.
    fn sync_texture(&mut self, ctx: &egui::Context) {
        if !self.texture_stale {
            return;
        }
        self.texture_stale = false;

        let Some(editor) = &self.editor else { return };
        let img = editor.export();
        let color_image = ColorImage::from_rgba_unmultiplied(
            [img.width() as usize, img.height() as usize],
            img.as_raw(),
        );
        let image_data = ImageData::Color(Arc::new(color_image));
        let options = TextureOptions {
            magnification: TextureFilter::Nearest,
            minification: TextureFilter::Linear,
            ..Default::default()
        };
        if let Some(tex) = &mut self.texture {
            tex.set(image_data, options);
        } else {
            self.texture = Some(ctx.load_texture("working_buffer", image_data, options));
        }
    }
}

impl eframe::App for BlockoutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Window title tracks the loaded file
        let title = match &self.source_path {
            Some(p) => format!(
                "Blockout - {}",
                p.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
            ),
            None => "Blockout".to_string(),
        };
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));

        self.sync_texture(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open…").clicked() {
                    self.open_clicked();
                    self.sync_texture(ctx);
                }
                if ui.button("Save…").clicked() {
                    self.save_clicked();
                }

                ui.separator();

                ui.label("Block size:");
                ui.add(egui::TextEdit::singleline(&mut self.block_size_input).desired_width(48.0));
                if ui.button("Rebin").clicked() {
                    self.rebin_clicked();
                    self.sync_texture(ctx);
                }

                ui.separator();

                ui.label("Blocks:");
                ui.add(egui::TextEdit::singleline(&mut self.count_input).desired_width(48.0));
                if ui.button("Erase").clicked() {
                    self.erase_clicked();
                    self.sync_texture(ctx);
                }
                if ui.button("Restore").clicked() {
                    self.restore_clicked();
                    self.sync_texture(ctx);
                }
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                if let Some(editor) = &self.editor {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!(
                            "{} / {} blocks active",
                            editor.active_count(),
                            editor.block_count()
                        ));
                    });
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(tex) = &self.texture else {
                ui.centered_and_justified(|ui| {
                    ui.label("No image loaded");
                });
                return;
            };

            // Fit the picture inside the available panel, preserving aspect
            let tex_size = tex.size_vec2();
            let panel = ui.available_rect_before_wrap();
            let scale = (panel.width() / tex_size.x)
                .min(panel.height() / tex_size.y)
                .min(1.0)
                .max(f32::EPSILON);
            let display = tex_size * scale;
            let offset = (panel.size() - display) * 0.5;
            let rect = egui::Rect::from_min_size(panel.min + offset.max(egui::Vec2::ZERO), display);

            ui.painter().image(
                tex.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        });
    }
}
