//! # Columnar Codec Test Suite
//!
//! Writes columns to real spill files and reads them back through the file
//! itself and through a memory map.
//!
//! ## Test Categories
//!
//! 1. **Spill Files**: columns interleaved in one temp file
//! 2. **Segment Maps**: persisted segmaps appended after the data
//! 3. **Corruption**: truncated files, tampered segmaps and oversized segments
//! 4. **Properties**: order preservation across forced spills
//!
//! ## Usage
//!
//! ```sh
//! cargo test --test codec
//! ```

use std::fs::File;
use std::io::Write;
use std::sync::Arc;

use memmap2::Mmap;
use proptest::prelude::*;
use semicore::config::MAX_SEGMENT_LEN;
use semicore::nano::Duration;
use semicore::types::{Primitive, Type};
use semicore::value::Value;
use semicore::vector::{
    decode_segmap, encode_segmap, DurationReader, DurationWriter, Float64Reader, Float64Writer,
    Int64Reader, Int64Writer, PrimitiveColumn, PrimitiveReader, PrimitiveWriter, Segment,
    SharedSpiller, Spiller, StringReader, StringWriter,
};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn spill_file(threshold: usize) -> (File, SharedSpiller<File>) {
    let file = tempfile::tempfile().expect("Failed to create temp file");
    let sink = file.try_clone().expect("Failed to clone file handle");
    let spiller = Spiller::<File>::builder()
        .threshold(threshold)
        .build_shared(sink)
        .expect("Failed to build spiller");
    (file, spiller)
}

fn memory_spiller(threshold: usize) -> SharedSpiller<Vec<u8>> {
    Spiller::<Vec<u8>>::builder()
        .threshold(threshold)
        .build_shared(Vec::new())
        .expect("Failed to build spiller")
}

fn into_sink(spiller: SharedSpiller<Vec<u8>>) -> Vec<u8> {
    match Arc::try_unwrap(spiller) {
        Ok(mutex) => mutex.into_inner().into_inner(),
        Err(_) => panic!("spiller still shared"),
    }
}

// ============================================================================
// SPILL FILES
// ============================================================================

#[cfg(unix)]
#[test]
fn interleaved_columns_read_back_from_file_and_map() {
    let (file, spiller) = spill_file(32);

    let mut ids = Int64Writer::new(spiller.clone());
    let mut names = StringWriter::new(spiller.clone());
    let mut scores = Float64Writer::new(spiller.clone());
    for i in 0..500i64 {
        ids.write(i * 7 - 1000).unwrap();
        names.write(format!("user-{:04}", i)).unwrap();
        if i % 5 == 0 {
            scores.write_null().unwrap();
        } else {
            scores.write(i as f64 / 4.0).unwrap();
        }
    }
    ids.flush(true).unwrap();
    names.flush(true).unwrap();
    scores.flush(true).unwrap();
    spiller.lock().flush().unwrap();

    let id_map = ids.segmap().to_vec();
    let name_map = names.segmap().to_vec();
    let score_map = scores.segmap().to_vec();
    assert!(id_map.len() > 1 && name_map.len() > 1 && score_map.len() > 1);

    let mut ids = Int64Reader::new(id_map.clone(), &file);
    let mut names = StringReader::new(name_map.clone(), &file);
    let mut scores = Float64Reader::new(score_map.clone(), &file);
    for i in 0..500i64 {
        assert_eq!(ids.read().unwrap(), Some(i * 7 - 1000));
        assert_eq!(names.read().unwrap(), Some(format!("user-{:04}", i)));
        let expected = if i % 5 == 0 { None } else { Some(i as f64 / 4.0) };
        assert_eq!(scores.read_nullable().unwrap(), Some(expected));
    }
    assert_eq!(ids.read().unwrap(), None);

    let map = unsafe { Mmap::map(&file).expect("Failed to map spill file") };
    let mut from_map = StringReader::new(name_map, &map);
    for i in 0..500i64 {
        assert_eq!(from_map.read().unwrap(), Some(format!("user-{:04}", i)));
    }
    assert_eq!(from_map.read().unwrap(), None);
}

#[test]
fn untyped_writer_and_reader_share_layout_with_values() {
    let spiller = memory_spiller(16);
    let mut writer = PrimitiveWriter::new(Type::DURATION, spiller.clone());
    for secs in [1i64, 60, 3600] {
        writer
            .write_value(&Value::duration(Duration(secs * 1_000_000_000)))
            .unwrap();
    }
    writer.write_value(&Value::null(Type::DURATION)).unwrap();
    writer.flush(true).unwrap();
    let column = writer.column();
    drop(writer);

    let sink = into_sink(spiller);
    let mut reader = PrimitiveReader::new(column.clone(), &sink);
    let texts: Vec<String> = std::iter::from_fn(|| reader.read_value().unwrap())
        .map(|v| v.to_string())
        .collect();
    assert_eq!(texts, vec!["1s", "1m", "1h", "null"]);

    let mut typed = DurationReader::new(column.segmap, &sink);
    assert_eq!(typed.read().unwrap(), Some(Duration(1_000_000_000)));
}

// ============================================================================
// SEGMENT MAPS
// ============================================================================

#[cfg(unix)]
#[test]
fn segmap_persisted_after_the_data() {
    let (mut file, spiller) = spill_file(8);
    let mut w = DurationWriter::new(spiller.clone());
    for i in 0..64 {
        w.write(Duration(i)).unwrap();
    }
    w.flush(true).unwrap();
    let segmap = w.segmap().to_vec();
    drop(w);

    let data_len = spiller.lock().offset();
    let encoded = encode_segmap(&segmap).unwrap();
    file.write_all(&encoded).unwrap();

    let map = unsafe { Mmap::map(&file).unwrap() };
    let restored = decode_segmap(&map[data_len as usize..]).unwrap();
    assert_eq!(restored, segmap);

    let mut r = DurationReader::new(restored, &map);
    for i in 0..64 {
        assert_eq!(r.read().unwrap(), Some(Duration(i)));
    }
    assert_eq!(r.read().unwrap(), None);
}

#[test]
fn segments_cover_the_sink_contiguously() {
    let spiller = memory_spiller(10);
    let mut a = Int64Writer::new(spiller.clone());
    let mut b = StringWriter::new(spiller.clone());
    for i in 0..40 {
        a.write(i).unwrap();
        b.write("abc".to_string()).unwrap();
    }
    a.flush(true).unwrap();
    b.flush(true).unwrap();

    let mut all: Vec<Segment> = a.segmap().iter().chain(b.segmap()).copied().collect();
    all.sort_by_key(|s| s.offset);
    let mut expected_offset = 0;
    for s in &all {
        assert_eq!(s.offset, expected_offset);
        expected_offset += s.length;
    }
    let total: u64 = a.segmap().iter().map(|s| s.count).sum();
    assert_eq!(total, 40);
    drop((a, b));
    assert_eq!(into_sink(spiller).len() as u64, expected_offset);
}

// ============================================================================
// CORRUPTION
// ============================================================================

#[test]
fn truncated_sink_fails_the_read() {
    let spiller = memory_spiller(1024);
    let mut w = StringWriter::new(spiller.clone());
    w.write("hello".to_string()).unwrap();
    w.flush(true).unwrap();
    let segmap = w.segmap().to_vec();
    drop(w);

    let mut sink = into_sink(spiller);
    sink.truncate(sink.len() - 2);
    let mut r = StringReader::new(segmap, sink);
    assert!(r.read().is_err());
}

#[test]
fn tampered_segment_count_is_detected() {
    let spiller = memory_spiller(1024);
    let mut w = PrimitiveWriter::new(Type::INT64, spiller.clone());
    w.write_value(&Value::int(Primitive::Int64, 1)).unwrap();
    w.write_value(&Value::int(Primitive::Int64, 2)).unwrap();
    w.flush(true).unwrap();
    let mut column: PrimitiveColumn = w.column();
    drop(w);
    column.segmap[0].count = 1;

    let sink = into_sink(spiller);
    let mut r = PrimitiveReader::new(column, sink);
    assert!(r.read_bytes().unwrap().is_some());
    assert!(r.read_bytes().is_err());
}

#[test]
fn oversized_segment_length_is_an_error() {
    let column = PrimitiveColumn::new(Type::INT64, vec![Segment::new(0, 1 << 62, 1)]);
    let mut r = PrimitiveReader::new(column, &[2u8, 2][..]);
    assert!(r.read_bytes().is_err());

    let column = PrimitiveColumn::new(Type::INT64, vec![Segment::new(0, MAX_SEGMENT_LEN + 1, 1)]);
    let mut r = PrimitiveReader::new(column, &[2u8, 2][..]);
    let err = r.read_bytes().unwrap_err();
    assert!(err.to_string().contains("exceeds"), "{}", err);
}

#[test]
fn segment_past_the_source_end_is_an_error() {
    let column = PrimitiveColumn::new(Type::INT64, vec![Segment::new(1, 64 * 1024 * 1024, 1)]);
    let mut r = PrimitiveReader::new(column, &[2u8, 2][..]);
    let err = r.read_bytes().unwrap_err();
    assert!(err.to_string().contains("past the end"), "{}", err);
}

#[test]
fn garbage_segmap_is_rejected() {
    assert!(decode_segmap(b"not a segmap at all").is_err());
    let mut encoded = encode_segmap(&[Segment::new(0, 1, 1)]).unwrap();
    encoded.pop();
    assert!(decode_segmap(&encoded).is_err());
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn order_preserved_across_forced_spills(
        values in prop::collection::vec(prop::option::of(any::<i64>()), 0..200),
        threshold in 1usize..64,
    ) {
        let spiller = memory_spiller(threshold);
        let mut w = Int64Writer::new(spiller.clone());
        for v in &values {
            match v {
                Some(v) => w.write(*v).unwrap(),
                None => w.write_null().unwrap(),
            }
        }
        w.flush(true).unwrap();
        let segmap = w.segmap().to_vec();
        drop(w);

        let count: u64 = segmap.iter().map(|s| s.count).sum();
        prop_assert_eq!(count, values.len() as u64);

        let sink = into_sink(spiller);
        let mut r = Int64Reader::new(segmap, sink.as_slice());
        let mut got = Vec::with_capacity(values.len());
        while let Some(v) = r.read_nullable().unwrap() {
            got.push(v);
        }
        prop_assert_eq!(got, values);
    }

    #[test]
    fn string_columns_survive_any_threshold(
        values in prop::collection::vec(".{0,12}", 0..60),
        threshold in 1usize..128,
    ) {
        let spiller = memory_spiller(threshold);
        let mut w = StringWriter::new(spiller.clone());
        for v in &values {
            w.write(v.clone()).unwrap();
        }
        w.flush(true).unwrap();
        let segmap = w.segmap().to_vec();
        drop(w);

        let sink = into_sink(spiller);
        let mut r = StringReader::new(segmap, &sink);
        for v in &values {
            let got = r.read().unwrap();
            prop_assert_eq!(got.as_ref(), Some(v));
        }
        prop_assert_eq!(r.read().unwrap(), None);
    }
}
