// Block partitioner unit tests

use blockout::{Block, partition};

#[test]
fn block_count_matches_grid() {
    // (width, height, block_size, expected ceil(h/b) * ceil(w/b))
    let cases = [
        (10, 10, 5, 4),
        (10, 10, 3, 16),
        (7, 5, 4, 4),
        (1, 1, 1, 1),
        (100, 50, 7, 15 * 8),
        (64, 64, 64, 1),
    ];
    for (w, h, b, expected) in cases {
        assert_eq!(
            partition(w, h, b).len(),
            expected,
            "partition({}, {}, {})",
            w,
            h,
            b
        );
    }
}

#[test]
fn tiles_cover_image_exactly_once() {
    let (w, h, b) = (7u32, 5u32, 3u32);
    let blocks = partition(w, h, b);

    let mut hits = vec![0u32; (w * h) as usize];
    for block in &blocks {
        for y in block.y0..block.y1 {
            for x in block.x0..block.x1 {
                hits[(y * w + x) as usize] += 1;
            }
        }
    }
    assert!(
        hits.iter().all(|&c| c == 1),
        "every pixel must belong to exactly one block"
    );
}

#[test]
fn edge_blocks_clamped_to_image_bounds() {
    let blocks = partition(10, 7, 4);
    // 3 columns x 2 rows; right column is 2 wide, bottom row is 3 tall
    assert_eq!(blocks.len(), 6);

    let right = blocks[2];
    assert_eq!((right.x0, right.x1), (8, 10));
    assert_eq!(right.width(), 2);

    let bottom = blocks[3];
    assert_eq!((bottom.y0, bottom.y1), (4, 7));
    assert_eq!(bottom.height(), 3);

    let corner = blocks[5];
    assert_eq!(corner, Block { x0: 8, y0: 4, x1: 10, y1: 7 });
}

#[test]
fn blocks_are_in_row_major_order() {
    let blocks = partition(6, 4, 2);
    assert_eq!(blocks.len(), 6);
    assert_eq!(blocks[0], Block { x0: 0, y0: 0, x1: 2, y1: 2 });
    assert_eq!(blocks[1], Block { x0: 2, y0: 0, x1: 4, y1: 2 });
    assert_eq!(blocks[2], Block { x0: 4, y0: 0, x1: 6, y1: 2 });
    // second tile row starts after the first is exhausted
    assert_eq!(blocks[3], Block { x0: 0, y0: 2, x1: 2, y1: 4 });
}

#[test]
fn oversized_block_size_yields_single_block() {
    let blocks = partition(10, 10, 100);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0], Block { x0: 0, y0: 0, x1: 10, y1: 10 });
    assert_eq!(blocks[0].area(), 100);
}

#[test]
fn partition_is_deterministic() {
    assert_eq!(partition(33, 21, 8), partition(33, 21, 8));
}

#[test]
fn block_contains_respects_half_open_ranges() {
    let b = Block { x0: 2, y0: 4, x1: 5, y1: 8 };
    assert!(b.contains(2, 4));
    assert!(b.contains(4, 7));
    assert!(!b.contains(5, 4));
    assert!(!b.contains(2, 8));
    assert!(!b.contains(0, 0));
}
