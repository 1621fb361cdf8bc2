#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vlist_core::WindowSpec;
use vlist_render::{Frame, HitId, HitRegion};
use vlist_widgets::{Align, StatefulWidget, VirtualizedList, VirtualizedListState};

#[derive(Debug, Arbitrary)]
enum Op {
    ScrollBy(i32),
    ScrollTo(u32),
    Reveal(u32, u8),
    Select(Option<u32>),
    Next,
    Previous,
    PageUp,
    PageDown,
    Bottom,
    Follow(bool),
    Overscan(u8),
}

#[derive(Debug, Arbitrary)]
struct Input {
    item_count: u16,
    row_height: u8,
    width: u8,
    height: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let row_height = u16::from(input.row_height % 6);
    let width = u16::from(input.width % 64);
    let height = u16::from(input.height % 48);
    let items: Vec<String> = (0..input.item_count).map(|i| format!("item {i}")).collect();

    let list = match VirtualizedList::new(&items, row_height) {
        Ok(list) => list.hit_id(HitId::new(1)),
        Err(_) => {
            assert_eq!(row_height, 0);
            return;
        }
    };
    let mut state = VirtualizedListState::new();
    let mut frame = Frame::with_hit_grid(width, height);
    let area = frame.area();

    for op in input.ops.into_iter().take(64) {
        match op {
            Op::ScrollBy(delta) => {
                state.scroll_by(i64::from(delta));
            }
            Op::ScrollTo(offset) => {
                state.scroll_to_offset(offset as usize);
            }
            Op::Reveal(index, align) => {
                let align = match align % 4 {
                    0 => Align::Start,
                    1 => Align::Center,
                    2 => Align::End,
                    _ => Align::Auto,
                };
                state.scroll_to_index(index as usize, align);
            }
            Op::Select(index) => {
                state.select(index.map(|i| i as usize));
            }
            Op::Next => {
                state.select_next();
            }
            Op::Previous => {
                state.select_previous();
            }
            Op::PageUp => {
                state.page_up();
            }
            Op::PageDown => {
                state.page_down();
            }
            Op::Bottom => {
                state.scroll_to_bottom();
            }
            Op::Follow(on) => state.set_follow(on),
            Op::Overscan(n) => state.set_overscan(usize::from(n % 16)),
        }
        frame.clear();
        list.render(area, &mut frame, &mut state);

        if area.is_empty() {
            continue;
        }
        let spec = WindowSpec::new(items.len(), f64::from(row_height), f64::from(height))
            .unwrap()
            .with_overscan(state.overscan());
        let window = spec.window(state.scroll_offset() as f64);
        assert_eq!(state.materialized(), window.range);
        assert!(state.scroll_offset() as f64 <= spec.max_scroll_offset());
        if let Some(selected) = state.selected() {
            assert!(selected < items.len());
        }
        // A one-column area may hold nothing but the scrollbar.
        if width < 2 {
            continue;
        }
        for row in 0..height {
            let by_state = state.index_at_row(row);
            let by_hit = frame
                .hit_test(0, row)
                .filter(|h| h.region == HitRegion::Content)
                .map(|h| h.data as usize);
            assert_eq!(by_state, by_hit);
        }
    }
});
