// Variable-element FIFO tests
// Run with: cargo test --test var_fifo -- --nocapture

use dmxp_fifo::Core::{words_for, WORD};
use dmxp_fifo::FIFO::Structs::{CorruptionPolicy, Cursors};
use dmxp_fifo::FIFO::Var::layout::WRAP_MARKER;
use dmxp_fifo::FIFO::Queue;
use dmxp_fifo::{FifoError, VFifo};
use std::collections::VecDeque;

fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len).map(|i| seed.wrapping_add(i as u8)).collect()
}

fn push(fifo: &mut VFifo<&mut [usize]>, payload: &[u8]) -> bool {
    match fifo.write_elem(payload.len()) {
        Some(area) => {
            area.copy_from_slice(payload);
            true
        }
        None => false,
    }
}

#[test]
fn three_ten_word_elements() {
    let mut mem = [0usize; 64];
    let mut fifo = VFifo::init(&mut mem[..], 16 * WORD).unwrap();

    for i in 0..3u8 {
        assert!(push(&mut fifo, &pattern(10 * WORD, i)), "write {} failed", i);
    }
    assert_eq!(fifo.len(), 3);

    for i in 0..3u8 {
        let elem = fifo.read_elem().expect("element should be there");
        assert_eq!(elem.size(), 10 * WORD);
        assert!(elem.is_intact());
        assert_eq!(elem.payload, &pattern(10 * WORD, i)[..]);
    }
    assert!(fifo.read_elem().is_none());
    assert!(fifo.is_empty());
}

#[test]
fn odd_sizes_round_trip() {
    let mut mem = [0usize; 32];
    let mut fifo = VFifo::init(&mut mem[..], 8 * WORD).unwrap();

    for (i, len) in [1usize, 3, WORD + 1, 2 * WORD - 1].iter().enumerate() {
        assert!(push(&mut fifo, &pattern(*len, i as u8)));
    }
    for (i, len) in [1usize, 3, WORD + 1, 2 * WORD - 1].iter().enumerate() {
        let elem = fifo.read_elem().unwrap();
        // The original size comes back, not the padded footprint
        assert_eq!(elem.size(), *len);
        assert_eq!(elem.payload, &pattern(*len, i as u8)[..]);
    }
}

#[test]
fn room_of_an_empty_fifo() {
    let mut mem = [0usize; 64];
    let fifo = VFifo::init(&mut mem[..], 16 * WORD).unwrap();
    assert_eq!(fifo.room(), 62);
    assert!(!fifo.is_full());
    assert!(fifo.is_empty());
}

#[test]
fn room_is_exact_when_write_is_ahead_and_behind() {
    let mut mem = [0usize; 64];
    let mut fifo = VFifo::init(&mut mem[..], 64 * WORD).unwrap();

    // A: words 0..12, B: words 12..26
    assert!(push(&mut fifo, &pattern(10 * WORD, 1)));
    assert!(push(&mut fifo, &pattern(12 * WORD, 2)));
    fifo.read_elem().unwrap();

    // write (26) ahead of read (12): tail 64 - 26 beats head 12
    let room = fifo.room();
    assert_eq!(room, 36);
    assert!(fifo.write_elem(room * WORD + 1).is_none());
    assert!(fifo.write_elem((room + 1) * WORD).is_none());
    assert!(fifo.write_elem(room * WORD).is_some());
    assert_eq!(fifo.cursors().write, 0, "element abutting the end wraps the cursor");

    // write (0) behind read (12)
    let room = fifo.room();
    assert_eq!(room, 10);
    assert!(fifo.write_elem((room + 1) * WORD).is_none());
    assert!(fifo.write_elem(room * WORD).is_some());

    // write caught up with read
    assert_eq!(fifo.room(), 0);
    assert!(fifo.is_full());
    assert!(fifo.write_elem(0).is_none(), "a full fifo takes no empty frame either");
}

#[test]
fn head_arc_is_used_when_larger() {
    let mut mem = [0usize; 32];
    {
        let mut fifo = VFifo::init(&mut mem[..], 32 * WORD).unwrap();

        // A: 0..10, B: 10..20, C: 20..26
        assert!(push(&mut fifo, &pattern(8 * WORD, 0xA)));
        assert!(push(&mut fifo, &pattern(8 * WORD, 0xB)));
        assert!(push(&mut fifo, &pattern(4 * WORD, 0xC)));
        fifo.read_elem().unwrap();
        fifo.read_elem().unwrap();

        // tail room 32 - 26 - 2 = 4, head room 20 - 2 = 18
        assert_eq!(fifo.room(), 18);

        let before = fifo.cursors();
        assert!(fifo.write_elem(19 * WORD).is_none());
        assert_eq!(fifo.cursors(), before, "a rejected write changes nothing");

        assert!(push(&mut fifo, &pattern(18 * WORD, 0xD)));
        assert_eq!(fifo.cursors().write, 20);
        assert_eq!(fifo.room(), 0);

        // C is still first, then D from the start of the region
        let c = fifo.read_elem().unwrap();
        assert_eq!(c.payload, &pattern(4 * WORD, 0xC)[..]);
        let d = fifo.read_elem().unwrap();
        assert_eq!(d.offset, 0);
        assert_eq!(d.payload, &pattern(18 * WORD, 0xD)[..]);
        assert!(fifo.is_empty());
    }
    assert_eq!(mem[26], WRAP_MARKER);
}

#[test]
fn rejected_head_wrap_leaves_no_marker() {
    let mut mem = [0usize; 32];
    {
        let mut fifo = VFifo::init(&mut mem[..], 32 * WORD).unwrap();

        // A: 0..10, B: 10..26; read A so read sits at 10
        assert!(push(&mut fifo, &pattern(8 * WORD, 1)));
        assert!(push(&mut fifo, &pattern(14 * WORD, 2)));
        fifo.read_elem().unwrap();

        // neither the 6-word tail nor the 10-word head fits 12 words
        assert_eq!(fifo.room(), 8);
        assert!(fifo.write_elem(12 * WORD).is_none());
        assert_eq!(fifo.cursors().write, 26);
    }
    assert_eq!(mem[26], 0);
}

#[test]
fn maximum_element_size_is_enforced() {
    let mut mem = [0usize; 64];
    let mut fifo = VFifo::init(&mut mem[..], 4 * WORD).unwrap();

    assert!(fifo.room() > 5);
    assert!(fifo.write_elem(5 * WORD).is_none());
    assert!(fifo.write_elem(4 * WORD + 1).is_none());
    assert!(fifo.write_elem(4 * WORD).is_some());
    assert_eq!(fifo.max_element_size(), 4 * WORD);
}

#[test]
fn full_means_no_room_for_a_maximum_element() {
    let mut mem = [0usize; 16];
    let mut fifo = VFifo::init(&mut mem[..], 4 * WORD).unwrap();

    // 16 words hold two 6-word frames; 4 words remain, room 2
    assert!(push(&mut fifo, &pattern(4 * WORD, 1)));
    assert!(!fifo.is_full());
    assert!(push(&mut fifo, &pattern(4 * WORD, 2)));
    assert_eq!(fifo.room(), 2);
    assert!(fifo.is_full());
    assert!(push(&mut fifo, &pattern(2 * WORD, 3)), "smaller elements still fit");
}

#[test]
fn peek_does_not_consume() {
    let mut mem = [0usize; 32];
    let mut fifo = VFifo::init(&mut mem[..], 8 * WORD).unwrap();
    assert!(push(&mut fifo, &pattern(7, 1)));
    assert!(push(&mut fifo, &pattern(9, 2)));

    let before = fifo.cursors();
    let peeked = fifo.peek_elem().unwrap();
    assert_eq!(peeked.size(), 7);
    let peeked_at = peeked.payload.as_ptr();
    assert_eq!(fifo.cursors(), before);

    let read = fifo.read_elem().unwrap();
    assert_eq!(read.payload.as_ptr(), peeked_at);
    assert_eq!(read.payload, &pattern(7, 1)[..]);
    assert_eq!(fifo.peek_elem().unwrap().size(), 9);
}

#[test]
fn empty_element_in_a_two_word_tail() {
    let mut mem = [0usize; 8];
    let mut fifo = VFifo::init(&mut mem[..], 8 * WORD).unwrap();

    // 4 words of payload leaves a 2-word tail, enough for an empty frame
    assert!(push(&mut fifo, &pattern(4 * WORD, 1)));
    assert!(fifo.write_elem(0).is_some());
    assert_eq!(fifo.cursors().write, 0);

    assert_eq!(fifo.read_elem().unwrap().size(), 4 * WORD);
    let empty = fifo.read_elem().unwrap();
    assert_eq!(empty.size(), 0);
    assert_eq!(empty.offset, 6);
    assert!(empty.is_intact());
}

#[test]
fn emptied_fifo_starts_over_at_the_region_start() {
    let mut mem = [0usize; 32];
    let mut fifo = VFifo::init(&mut mem[..], 32 * WORD).unwrap();

    assert!(push(&mut fifo, &pattern(10 * WORD, 1)));
    fifo.read_elem().unwrap();
    assert_eq!(fifo.room(), 30);

    // the whole advertised room is usable although the cursors sat at 12
    assert!(push(&mut fifo, &pattern(30 * WORD, 2)));
    assert_eq!(fifo.read_elem().unwrap().offset, 0);
}

#[test]
fn wraparound_keeps_order_and_sizes() {
    let mut mem = [0usize; 64];
    let mut fifo = VFifo::init(&mut mem[..], 16 * WORD).unwrap();
    let mut model: VecDeque<Vec<u8>> = VecDeque::new();
    let mut rng = fastrand::Rng::with_seed(42);
    let mut wraps = 0;
    let mut seed = 0u8;

    for _ in 0..4_000 {
        if rng.u8(..) < 140 {
            let len = rng.usize(0..=16 * WORD);
            let fits = words_for(len) <= fifo.room();
            let write_before = fifo.cursors().write;
            let payload = pattern(len, seed);
            let stored = push(&mut fifo, &payload);
            // an empty frame may still fit where room() is 0
            if len > 0 {
                assert_eq!(stored, fits, "room() must match admission for {} bytes", len);
            }
            if stored {
                seed = seed.wrapping_add(1);
                model.push_back(payload);
                if fifo.cursors().write <= write_before {
                    wraps += 1;
                }
            }
        } else {
            let got = fifo.read_elem().map(|elem| {
                assert!(elem.is_intact());
                elem.payload.to_vec()
            });
            assert_eq!(got, model.pop_front());
        }
        assert_eq!(fifo.len(), model.len());
    }

    while let Some(expected) = model.pop_front() {
        assert_eq!(fifo.read_elem().unwrap().payload, &expected[..]);
    }
    assert!(wraps >= 2, "only {} physical wraps", wraps);
}

#[test]
fn empty_frame_needs_two_words_between_write_and_read() {
    let mut mem = [0usize; 16];
    let mut fifo = VFifo::init(&mut mem[..], 16 * WORD).unwrap();

    // A: 0..7, B: 7..12, C: 12..16 (write wraps to 0)
    assert!(push(&mut fifo, &pattern(5 * WORD, 0xA)));
    assert!(push(&mut fifo, &pattern(3 * WORD, 0xB)));
    assert!(push(&mut fifo, &pattern(2 * WORD, 0xC)));
    assert_eq!(fifo.cursors().write, 0);
    fifo.read_elem().unwrap();

    // D: 0..6 leaves a single word before B
    assert!(push(&mut fifo, &pattern(4 * WORD, 0xD)));
    assert_eq!(
        fifo.cursors(),
        Cursors {
            read: 7,
            write: 6,
            count: 3
        }
    );
    assert_eq!(fifo.room(), 0);

    let before = fifo.cursors();
    assert!(fifo.write_elem(0).is_none(), "a 2-word frame does not fit in 1 word");
    assert_eq!(fifo.cursors(), before);

    for (seed, words, offset) in [(0xB, 3, 7), (0xC, 2, 12), (0xD, 4, 0)] {
        let elem = fifo.read_elem().expect("queued element lost");
        assert_eq!(elem.offset, offset);
        assert!(elem.is_intact());
        assert_eq!(elem.payload, &pattern(words * WORD, seed)[..]);
    }
    assert!(fifo.is_empty());
}

#[test]
fn read_cursor_leaves_a_one_word_tail() {
    let mut mem = [0usize; 16];
    let mut fifo = VFifo::init(&mut mem[..], 16 * WORD).unwrap();

    // X: 0..4, A: 4..15, leaving one word before the end
    assert!(push(&mut fifo, &pattern(2 * WORD, 0x1)));
    assert!(push(&mut fifo, &pattern(9 * WORD, 0xA)));
    assert_eq!(fifo.cursors().write, 15);
    fifo.read_elem().unwrap();

    // B wraps to 0..3
    assert!(push(&mut fifo, &pattern(WORD, 0xB)));
    assert_eq!(fifo.cursors().write, 3);

    // consuming A parks nothing in the 1-word tail
    fifo.read_elem().unwrap();
    assert_eq!(fifo.cursors().read, 0);

    // F: 3..14, then an empty frame fills 14..16 exactly
    assert!(push(&mut fifo, &pattern(9 * WORD, 0xF)));
    assert_eq!(fifo.room(), 0);
    assert!(fifo.write_elem(0).is_some());
    assert_eq!(
        fifo.cursors(),
        Cursors {
            read: 0,
            write: 0,
            count: 3
        }
    );
    assert_eq!(fifo.room(), 0);
    assert!(fifo.write_elem(0).is_none(), "ring is full, B must survive");

    assert_eq!(fifo.read_elem().unwrap().payload, &pattern(WORD, 0xB)[..]);
    assert_eq!(fifo.read_elem().unwrap().payload, &pattern(9 * WORD, 0xF)[..]);
    let empty = fifo.read_elem().unwrap();
    assert_eq!((empty.offset, empty.size()), (14, 0));
    assert!(fifo.is_empty());
    assert_eq!(fifo.room(), 14);
}

#[test]
fn room_matches_admission_at_random_states() {
    const MAX_WORDS: usize = 12;
    let mut mem = [0usize; 48];
    let mut fifo = VFifo::init(&mut mem[..], MAX_WORDS * WORD).unwrap();
    let mut model: VecDeque<Vec<u8>> = VecDeque::new();
    let mut rng = fastrand::Rng::with_seed(29);
    let mut exact_fits = 0;
    let mut seed = 0u8;

    for step in 0..20_000 {
        match rng.u8(..4) {
            0 => {
                // one word over room() never fits and changes nothing
                let room = fifo.room();
                let before = fifo.cursors();
                assert!(fifo.write_elem((room + 1) * WORD).is_none(), "step {}", step);
                if !fifo.is_empty() {
                    assert_eq!(fifo.cursors(), before, "step {}", step);
                }

                // exactly room() always fits
                if room > 0 && room <= MAX_WORDS {
                    let payload = pattern(room * WORD, seed);
                    assert!(push(&mut fifo, &payload), "room {} refused at step {}", room, step);
                    seed = seed.wrapping_add(1);
                    model.push_back(payload);
                    exact_fits += 1;
                }
            }
            1 => {
                let len = rng.usize(0..=MAX_WORDS * WORD);
                let fits = words_for(len) <= fifo.room();
                let payload = pattern(len, seed);
                let stored = push(&mut fifo, &payload);
                if len > 0 {
                    assert_eq!(stored, fits, "{} bytes at step {}", len, step);
                }
                if stored {
                    seed = seed.wrapping_add(1);
                    model.push_back(payload);
                }
            }
            2 => {
                let got = fifo.peek_elem().map(|elem| elem.payload.to_vec());
                assert_eq!(got.as_ref(), model.front(), "peek at step {}", step);
            }
            _ => {
                let got = fifo.read_elem().map(|elem| {
                    assert!(elem.is_intact());
                    elem.payload.to_vec()
                });
                assert_eq!(got, model.pop_front(), "read at step {}", step);
            }
        }
        assert_eq!(fifo.len(), model.len());
    }
    assert!(exact_fits > 50, "only {} exact-room writes", exact_fits);
}

#[test]
fn overwritten_trailer_is_flagged_but_delivered() {
    let mut mem = [0usize; 32];
    let cursors = {
        let mut fifo = VFifo::init(&mut mem[..], 8 * WORD).unwrap();
        assert!(push(&mut fifo, &pattern(2 * WORD, 1)));
        assert!(push(&mut fifo, &pattern(WORD, 2)));
        fifo.cursors()
    };
    // producer ran past its two words
    mem[3] = 0x1234;

    let mut fifo = VFifo::resume(&mut mem[..], 8 * WORD, cursors).unwrap();
    let elem = fifo.read_elem().unwrap();
    assert!(!elem.is_intact());
    assert_eq!(elem.size(), 2 * WORD);
    assert_eq!(fifo.len(), 1);

    // the element behind it is unaffected
    let next = fifo.read_elem().unwrap();
    assert!(next.is_intact());
    assert_eq!(next.payload, &pattern(WORD, 2)[..]);
    drop(fifo);

    assert_eq!(mem[3], WRAP_MARKER, "trailer is marked");
}

#[test]
fn checked_read_reports_overwritten_trailer() {
    let mut mem = [0usize; 32];
    let cursors = {
        let mut fifo = VFifo::init(&mut mem[..], 8 * WORD).unwrap();
        assert!(push(&mut fifo, &pattern(2 * WORD, 1)));
        assert!(push(&mut fifo, &pattern(WORD, 2)));
        fifo.cursors()
    };
    mem[3] = 0x1234;

    let mut fifo = VFifo::resume(&mut mem[..], 8 * WORD, cursors).unwrap();
    assert!(matches!(
        fifo.peek_checked(),
        Err(FifoError::TrailerMismatch {
            offset: 0,
            found: 0x1234
        })
    ));
    assert_eq!(fifo.len(), 2, "peek leaves the element in place");

    assert!(matches!(
        fifo.read_checked(),
        Err(FifoError::TrailerMismatch { offset: 0, .. })
    ));
    assert_eq!(fifo.len(), 1, "the corrupt element is skipped");
    let next = fifo.read_checked().unwrap().unwrap();
    assert_eq!(next.payload, &pattern(WORD, 2)[..]);
}

#[test]
fn corrupt_headers_are_not_consumed() {
    // size above the configured maximum
    let mut mem = [0usize; 32];
    let cursors = {
        let mut fifo = VFifo::init(&mut mem[..], 4 * WORD).unwrap();
        assert!(push(&mut fifo, &pattern(WORD, 1)));
        fifo.cursors()
    };
    mem[0] = 5 * WORD;
    let mut fifo = VFifo::resume(&mut mem[..], 4 * WORD, cursors).unwrap();
    assert!(fifo.read_elem().is_none());
    assert_eq!(fifo.cursors(), cursors);
    assert!(matches!(
        fifo.read_checked(),
        Err(FifoError::Oversized {
            offset: 0,
            words: 5,
            max: 4
        })
    ));
    drop(fifo);

    // size that runs past the region end
    let mut mem = [0usize; 16];
    let cursors = {
        let mut fifo = VFifo::init(&mut mem[..], 64 * WORD).unwrap();
        assert!(push(&mut fifo, &pattern(WORD, 1)));
        fifo.cursors()
    };
    mem[0] = 15 * WORD;
    let mut fifo = VFifo::resume(&mut mem[..], 64 * WORD, cursors).unwrap();
    assert!(fifo.peek_elem().is_none());
    assert!(matches!(
        fifo.read_checked(),
        Err(FifoError::Overrun {
            offset: 0,
            words: 15,
            end: 16
        })
    ));
    assert_eq!(fifo.len(), 1);
    drop(fifo);

    // wrap marker where the first element should be
    mem[0] = WRAP_MARKER;
    let mut fifo = VFifo::resume(&mut mem[..], 64 * WORD, cursors).unwrap();
    assert!(matches!(
        fifo.read_checked(),
        Err(FifoError::StrayWrapMarker)
    ));
}

#[test]
fn reject_policy_surfaces_corruption_through_queue() {
    let mut mem = [0usize; 32];
    let cursors = {
        let mut fifo = VFifo::init(&mut mem[..], 8 * WORD).unwrap();
        assert!(Queue::enqueue(&mut fifo, &pattern(WORD, 1)));
        assert!(Queue::enqueue(&mut fifo, &pattern(WORD, 2)));
        fifo.cursors()
    };
    mem[2] = 0;

    let mut fifo = VFifo::resume(&mut mem[..], 8 * WORD, cursors).unwrap();
    assert!(fifo.dequeue(CorruptionPolicy::Reject).is_err());
    assert_eq!(
        fifo.dequeue(CorruptionPolicy::Reject).unwrap(),
        Some(pattern(WORD, 2))
    );

    let mut mem = [0usize; 32];
    let cursors = {
        let mut fifo = VFifo::init(&mut mem[..], 8 * WORD).unwrap();
        assert!(Queue::enqueue(&mut fifo, &pattern(WORD, 1)));
        fifo.cursors()
    };
    mem[2] = 0;
    let mut fifo = VFifo::resume(&mut mem[..], 8 * WORD, cursors).unwrap();
    assert_eq!(
        fifo.dequeue(CorruptionPolicy::Recover).unwrap(),
        Some(pattern(WORD, 1))
    );
}

#[test]
fn init_and_resume_validation() {
    let mut mem = [0usize; 1];
    assert!(matches!(
        VFifo::init(&mut mem[..], WORD),
        Err(FifoError::RegionTooSmall(1))
    ));

    let mut mem = [0usize; 16];
    let bad = Cursors {
        read: 0,
        write: 16,
        count: 1,
    };
    assert!(matches!(
        VFifo::resume(&mut mem[..], WORD, bad),
        Err(FifoError::InvalidCursors { .. })
    ));

    // a read cursor in a 1-word tail continues at the start
    let parked = Cursors {
        read: 15,
        write: 3,
        count: 1,
    };
    let fifo = VFifo::resume(&mut mem[..], WORD, parked).unwrap();
    assert_eq!(fifo.cursors().read, 0);
}

#[test]
fn clear_resets_cursors() {
    let mut mem = [0usize; 32];
    let mut fifo = VFifo::init(&mut mem[..], 8 * WORD).unwrap();
    assert!(push(&mut fifo, &pattern(WORD, 1)));
    assert!(push(&mut fifo, &pattern(WORD, 2)));

    fifo.clear();
    assert!(fifo.is_empty());
    assert_eq!(fifo.cursors(), Cursors::default());
    assert!(fifo.read_elem().is_none());
    assert_eq!(fifo.room(), 30);
}
