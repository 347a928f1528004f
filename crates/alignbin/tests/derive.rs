// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// #[derive(Aligned)]: descriptors, leaf order, skip fields, tuple/unit/generic
// structs, nesting.

#![allow(clippy::unreadable_literal)]

use alignbin::{
    Aligned, AlignFactor, BigEndian, Complex64, Engine, Error, FieldDescriptor, LittleEndian,
    ScalarKind, TypeDescriptor,
};

#[derive(Aligned, Debug, Default, Clone, PartialEq)]
struct Header {
    valid: bool,
    tag: [i8; 4],
    length: i32,
}

#[derive(Aligned, Debug, Default, Clone, PartialEq)]
struct WithSkip {
    id: u16,
    #[alignbin(skip)]
    scratch: u32,
    value: u16,
}

#[derive(Aligned, Debug, Default, Clone, PartialEq)]
struct Point(f32, f32);

#[derive(Aligned, Debug, Default, Clone, PartialEq)]
struct Marker;

#[derive(Aligned, Debug, Default, Clone, PartialEq)]
struct Frame {
    seq: u8,
    origin: Point,
    samples: [Point; 2],
    header: Header,
    marker: Marker,
}

#[derive(Aligned, Debug, Default, Clone, PartialEq)]
struct Pair<T> {
    first: T,
    second: T,
}

#[derive(Aligned, Debug, Default, Clone, PartialEq)]
struct Spectrum {
    bin: u8,
    peak: Complex64,
}

fn header() -> Header {
    Header {
        valid: true,
        tag: [1, 2, 3, 4],
        length: 0x01020304,
    }
}

#[test]
fn test_header_example_layout_and_bytes() {
    let engine = Engine::new(AlignFactor::Four);
    let codec = engine.codec_for::<Header>().unwrap();

    let mem: Vec<_> = codec.fields().iter().map(|f| f.mem_offset).collect();
    let wire: Vec<_> = codec.fields().iter().map(|f| f.wire_offset).collect();
    assert_eq!(mem, [0, 1, 8]);
    assert_eq!(codec.memory_size(), 12);
    assert_eq!(wire, [0, 1, 5]);
    assert_eq!(codec.wire_size(), 9);

    let bytes = engine.encode::<LittleEndian, _>(&header()).unwrap();
    assert_eq!(bytes, [0x01, 0x01, 0x02, 0x03, 0x04, 0x04, 0x03, 0x02, 0x01]);

    let mut back = Header::default();
    engine.decode::<LittleEndian, _>(&bytes, &mut back).unwrap();
    assert_eq!(back, header());
}

#[test]
fn test_descriptor_shape() {
    assert_eq!(
        Header::descriptor(),
        TypeDescriptor::aggregate(
            "Header",
            vec![
                FieldDescriptor::new("valid", ScalarKind::Bool.into()),
                FieldDescriptor::new("tag", TypeDescriptor::array(ScalarKind::I8.into(), 4)),
                FieldDescriptor::new("length", ScalarKind::I32.into()),
            ],
        )
    );

    let point = Point::descriptor();
    let names: Vec<_> = point
        .fields()
        .unwrap()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, ["0", "1"]);

    assert_eq!(Marker::descriptor().fields().map(<[_]>::len), Some(0));
    assert!(WithSkip::descriptor().field("scratch").unwrap().skip);
    assert_eq!(Header::SCALAR, None);
}

#[test]
fn test_skip_field_is_off_the_wire_and_untouched() {
    let engine = Engine::default();
    let value = WithSkip {
        id: 0x0102,
        scratch: 0xDEADBEEF,
        value: 0x0304,
    };
    let wire = engine.encode::<BigEndian, _>(&value).unwrap();
    assert_eq!(wire, [0x01, 0x02, 0x03, 0x04]);

    let mut target = WithSkip {
        id: 0,
        scratch: 77,
        value: 0,
    };
    engine.decode::<BigEndian, _>(&wire, &mut target).unwrap();
    assert_eq!(target.id, 0x0102);
    assert_eq!(target.value, 0x0304);
    assert_eq!(target.scratch, 77);

    // The skipped u32 still pushes `value` to offset 8 in memory.
    let codec = engine.codec_for::<WithSkip>().unwrap();
    assert_eq!(codec.field("value").unwrap().mem_offset, 8);
    assert_eq!(codec.memory_size(), 12);
}

#[test]
fn test_nested_structs_roundtrip() {
    let engine = Engine::new(AlignFactor::Two);
    let frame = Frame {
        seq: 9,
        origin: Point(1.5, -2.5),
        samples: [Point(0.25, 0.5), Point(f32::MAX, f32::MIN_POSITIVE)],
        header: header(),
        marker: Marker,
    };

    let wire = engine.encode::<BigEndian, _>(&frame).unwrap();
    // u8 + 2 f32 + 4 f32 + header(9) + marker(0)
    assert_eq!(wire.len(), 1 + 8 + 16 + 9);
    assert_eq!(wire[0], 9);
    assert_eq!(&wire[1..5], &1.5f32.to_bits().to_be_bytes());

    let mut back = Frame::default();
    engine.decode::<BigEndian, _>(&wire, &mut back).unwrap();
    assert_eq!(back, frame);
}

#[test]
fn test_generic_struct() {
    let engine = Engine::default();
    let pair = Pair {
        first: [1u16, 2],
        second: [3u16, 4],
    };
    let wire = engine.encode::<LittleEndian, _>(&pair).unwrap();
    assert_eq!(wire, [1, 0, 2, 0, 3, 0, 4, 0]);

    let mut back = Pair::<[u16; 2]>::default();
    engine.decode::<LittleEndian, _>(&wire, &mut back).unwrap();
    assert_eq!(back, pair);

    // Different instantiations are different cache entries.
    engine.codec_for::<Pair<u8>>().unwrap();
    assert_eq!(engine.cache().len(), 2);
}

#[test]
fn test_complex_field_alignment() {
    let natural = Engine::default().codec_for::<Spectrum>().unwrap();
    assert_eq!(natural.field("peak").unwrap().mem_offset, 8);
    assert_eq!(natural.memory_size(), 16);

    let packed = Engine::new(AlignFactor::Four)
        .codec_for::<Spectrum>()
        .unwrap();
    assert_eq!(packed.field("peak").unwrap().mem_offset, 4);
    assert_eq!(packed.memory_size(), 12);
    assert_eq!(packed.wire_size(), 9);
}

#[test]
fn test_unit_struct_encodes_to_nothing() {
    let engine = Engine::default();
    assert!(engine.encode::<LittleEndian, _>(&Marker).unwrap().is_empty());
    let mut m = Marker;
    assert_eq!(engine.decode::<LittleEndian, _>(&[], &mut m).unwrap(), 0);
}

#[test]
fn test_short_buffer_for_derived_type() {
    let engine = Engine::new(AlignFactor::Four);
    let mut target = header();
    let err = engine
        .decode::<LittleEndian, _>(&[1, 2, 3], &mut target)
        .unwrap_err();
    assert!(matches!(err, Error::ShortBuffer { need: 9, have: 3 }));
    assert_eq!(target, header());
}

#[test]
fn test_huge_array_of_unit_structs_has_an_empty_plan() {
    let engine = Engine::default();
    let codec = engine.codec_for::<[Marker; usize::MAX]>().unwrap();
    assert_eq!(codec.wire_size(), 0);
    assert!(codec.leaves().is_empty());
}
