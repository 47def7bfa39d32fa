//! Fuzz testing for the column reader.
//!
//! Arbitrary bytes are read as a column of an arbitrary primitive type
//! through an arbitrary segment map. The reader must report corruption as
//! errors, and every value it yields must format without panicking.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use semicore::types::{Primitive, Type};
use semicore::vector::{PrimitiveColumn, PrimitiveReader, Segment};

#[derive(Debug, Arbitrary)]
struct ReaderInput {
    primitive: u8,
    segments: Vec<(u64, u64, u64)>,
    data: Vec<u8>,
}

fuzz_target!(|input: ReaderInput| {
    if input.segments.len() > 64 {
        return;
    }

    let primitive = Primitive::ALL[input.primitive as usize % Primitive::ALL.len()];
    let segmap: Vec<Segment> = input
        .segments
        .iter()
        .map(|&(offset, length, count)| Segment::new(offset, length, count))
        .collect();

    let column = PrimitiveColumn::new(Type::Primitive(primitive), segmap);
    let mut reader = PrimitiveReader::new(column, input.data.as_slice());
    for _ in 0..4096 {
        match reader.read_value() {
            Ok(Some(val)) => {
                let _ = val.to_string();
            }
            Ok(None) | Err(_) => break,
        }
    }
});
