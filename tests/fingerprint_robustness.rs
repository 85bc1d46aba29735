//! End-to-end behaviour of picture codes on wallpaper-sized pictures.

mod common;

use common::{jpeg_bytes, wallpaper};
use image::imageops::FilterType;
use spotlight_pics::core::codec::{compare_images, fingerprint, Fingerprinter, CODE_TEXT_LEN};
use spotlight_pics::core::decode::decode_bytes;
use spotlight_pics::core::matcher::{is_match, similarity};
use std::path::Path;

#[test]
fn identical_copy_gives_identical_code() {
    let original = wallpaper(0);
    let copy = original.clone();

    let a = fingerprint(&original).unwrap();
    let b = fingerprint(&copy).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.to_string().len(), CODE_TEXT_LEN);
    assert!(is_match(&a, &b));
}

#[test]
fn byte_identical_files_give_identical_codes() {
    let bytes = jpeg_bytes(&wallpaper(1), 90);

    let a = decode_bytes(Path::new("a"), &bytes).unwrap();
    let b = decode_bytes(Path::new("b"), &bytes.clone()).unwrap();

    let mut fingerprinter = Fingerprinter::new();
    assert_eq!(
        fingerprinter.fingerprint(&a.image).unwrap(),
        fingerprinter.fingerprint(&b.image).unwrap()
    );
}

#[test]
fn low_quality_resave_still_matches() {
    let original = wallpaper(2);
    let resaved = decode_bytes(Path::new("resaved.jpg"), &jpeg_bytes(&original, 60)).unwrap();

    let a = fingerprint(&original).unwrap();
    let b = fingerprint(&resaved.image).unwrap();

    assert!(is_match(&a, &b), "similarity {}", a.similarity(&b));
    assert!(compare_images(&original, &resaved.image).unwrap() > 0.95);
}

#[test]
fn downscaled_copy_still_matches() {
    let original = wallpaper(3);
    let smaller = original.resize_exact(800, 533, FilterType::Triangle);

    let a = fingerprint(&original).unwrap();
    let b = fingerprint(&smaller).unwrap();

    assert!(is_match(&a, &b), "similarity {}", a.similarity(&b));
}

#[test]
fn unrelated_pictures_do_not_match() {
    let a = fingerprint(&wallpaper(0)).unwrap();
    let b = fingerprint(&wallpaper(2)).unwrap();

    assert!(!is_match(&a, &b));
    assert!(a.similarity(&b) < 0.9);
}

#[test]
fn mirrored_picture_does_not_match() {
    let original = wallpaper(4);
    let mirrored = original.fliph();

    let a = fingerprint(&original).unwrap();
    let b = fingerprint(&mirrored).unwrap();

    assert!(!is_match(&a, &b));
}

#[test]
fn text_and_typed_scores_agree_on_the_verdict() {
    let original = wallpaper(5);
    let resaved = decode_bytes(Path::new("r"), &jpeg_bytes(&original, 60)).unwrap();

    let codes = [
        fingerprint(&original).unwrap(),
        fingerprint(&resaved.image).unwrap(),
        fingerprint(&wallpaper(6)).unwrap(),
    ];

    for a in &codes {
        for b in &codes {
            let text_score = similarity(&a.to_string(), &b.to_string()).unwrap();
            assert_eq!(text_score > 0.95, is_match(a, b));
        }
    }
}
