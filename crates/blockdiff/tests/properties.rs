//! Property-based tests for the general round-trip and framing laws.

use blockdiff::diff;
use proptest::prelude::*;

proptest! {
    #[test]
    fn round_trip_holds_for_arbitrary_buffers(
        reference in prop::collection::vec(any::<u8>(), 1..2_000),
        target in prop::collection::vec(any::<u8>(), 1..2_000),
    ) {
        let delta = diff(&reference, &target, 0).expect("non-empty buffers always encode");
        let rebuilt = blockdiff_apply::apply(&reference, &delta).expect("delta produced by diff() must be well-formed");
        prop_assert_eq!(rebuilt, target);
    }

    #[test]
    fn identity_input_round_trips(data in prop::collection::vec(any::<u8>(), 1..4_000)) {
        let delta = diff(&data, &data, 0).unwrap();
        let rebuilt = blockdiff_apply::apply(&data, &delta).unwrap();
        prop_assert_eq!(rebuilt, data);
    }

    #[test]
    fn insert_runs_never_exceed_127_bytes(
        reference in prop::collection::vec(any::<u8>(), 1..500),
        target in prop::collection::vec(any::<u8>(), 1..500),
    ) {
        let delta = diff(&reference, &target, 0).unwrap();
        let mut pos = skip_header(&delta);
        while pos < delta.len() {
            let opcode = delta[pos];
            pos += 1;
            if opcode & 0x80 == 0 {
                prop_assert!(opcode >= 1 && opcode <= 127);
                pos += opcode as usize;
            } else {
                let mask = opcode;
                for bit in 0..4 {
                    if mask & (1 << bit) != 0 {
                        pos += 1;
                    }
                }
                for bit in 0..2 {
                    if mask & (1 << (4 + bit)) != 0 {
                        pos += 1;
                    }
                }
            }
        }
    }
}

fn skip_header(delta: &[u8]) -> usize {
    let mut pos = 0;
    for _ in 0..2 {
        loop {
            let byte = delta[pos];
            pos += 1;
            if byte & 0x80 == 0 {
                break;
            }
        }
    }
    pos
}
