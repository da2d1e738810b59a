// Image IO and error taxonomy tests

use std::fs;
use std::path::PathBuf;

use blockout::io::{decode_image, encode_and_write};
use blockout::{BlockEditor, EditorError};
use image::{Rgba, RgbaImage};

fn gradient(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        Rgba([
            (x % 200 + 20) as u8,
            (y % 200 + 20) as u8,
            ((x * 3 + y) % 200 + 20) as u8,
            255,
        ])
    })
}

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("blockout_tests_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn png_save_and_reload_round_trip() {
    let mut editor = BlockEditor::with_seed(gradient(9, 7), 4, 31).unwrap();
    editor.erase_n(3);

    let path = scratch_dir().join("round_trip.png");
    editor.save(&path).unwrap();

    let reloaded = decode_image(&path).unwrap();
    assert_eq!(reloaded, *editor.export());

    let _ = fs::remove_file(path);
}

#[test]
fn reloaded_image_can_be_edited_again() {
    let src = scratch_dir().join("reload_edit.png");
    encode_and_write(&gradient(12, 12), &src, 90).unwrap();

    let mut editor = BlockEditor::open(&src, 6).unwrap();
    assert_eq!(editor.block_count(), 4);
    assert_eq!(editor.erase_n(4), 4);

    let _ = fs::remove_file(src);
}

#[test]
fn missing_file_reports_io_error() {
    let path = scratch_dir().join("does_not_exist.png");
    assert!(matches!(decode_image(&path), Err(EditorError::Io(_))));
}

#[test]
fn garbage_bytes_report_decode_error() {
    let path = scratch_dir().join("garbage.png");
    fs::write(&path, b"this is not a png at all").unwrap();

    assert!(matches!(decode_image(&path), Err(EditorError::Decode(_))));

    let _ = fs::remove_file(path);
}

#[test]
fn unsupported_extension_reports_encode_error() {
    let path = scratch_dir().join("output.xyz");
    assert!(matches!(
        encode_and_write(&gradient(4, 4), &path, 90),
        Err(EditorError::Encode(_))
    ));
}

#[test]
fn failed_save_leaves_working_buffer_intact() {
    let mut editor = BlockEditor::with_seed(gradient(10, 10), 5, 13).unwrap();
    editor.erase_n(2);
    let before = editor.export().clone();

    let bad = scratch_dir().join("no_such_dir").join("out.xyz");
    assert!(editor.save(&bad).is_err());
    assert_eq!(*editor.export(), before);
}
