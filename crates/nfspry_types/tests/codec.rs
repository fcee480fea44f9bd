// Tests for the XDR primitive types.
#![allow(clippy::unwrap_used)]

use std::io::Cursor;

use nfspry_types::xdr::{List, Opaque, Pack, Unpack, Void};

#[test]
fn primitives_are_big_endian() {
    let mut buf = Vec::new();
    0x0102_0304u32.pack(&mut buf).unwrap();
    assert_eq!(buf, [1, 2, 3, 4]);

    let mut buf = Vec::new();
    0x0102_0304_0506_0708u64.pack(&mut buf).unwrap();
    assert_eq!(buf, [1, 2, 3, 4, 5, 6, 7, 8]);

    let mut buf = Vec::new();
    (-2i32).pack(&mut buf).unwrap();
    assert_eq!(buf, [0xff, 0xff, 0xff, 0xfe]);
}

#[test]
fn bool_encoding() {
    let mut buf = Vec::new();
    true.pack(&mut buf).unwrap();
    false.pack(&mut buf).unwrap();
    assert_eq!(buf, [0, 0, 0, 1, 0, 0, 0, 0]);

    let mut cursor = Cursor::new(vec![0, 0, 0, 2]);
    assert!(bool::unpack(&mut cursor).is_err());
}

#[test]
fn opaque_is_padded_to_four_bytes() {
    let opaque = Opaque::borrowed(&[0xaa, 0xbb, 0xcc, 0xdd, 0xee]);
    assert_eq!(opaque.packed_size(), 12);

    let mut buf = Vec::new();
    let written = opaque.pack(&mut buf).unwrap();
    assert_eq!(written, 12);
    assert_eq!(
        buf,
        [
            0x00, 0x00, 0x00, 0x05, // length
            0xaa, 0xbb, 0xcc, 0xdd, 0xee, // data
            0x00, 0x00, 0x00, // padding
        ]
    );

    let mut cursor = Cursor::new(buf);
    let (decoded, read) = Opaque::unpack(&mut cursor).unwrap();
    assert_eq!(read, 12);
    assert_eq!(decoded.as_ref(), opaque.as_ref());
}

#[test]
fn empty_opaque() {
    let opaque = Opaque::borrowed(&[]);
    let mut buf = Vec::new();
    assert_eq!(opaque.pack(&mut buf).unwrap(), 4);
    assert_eq!(buf, [0, 0, 0, 0]);
}

#[test]
fn list_uses_value_follows_markers() {
    let list = List(vec![7u32, 8u32]);
    let mut buf = Vec::new();
    let written = list.pack(&mut buf).unwrap();
    assert_eq!(written, list.packed_size());
    assert_eq!(
        buf,
        [
            0, 0, 0, 1, 0, 0, 0, 7, // entry
            0, 0, 0, 1, 0, 0, 0, 8, // entry
            0, 0, 0, 0, // end of list
        ]
    );

    let mut cursor = Cursor::new(buf);
    let (decoded, read) = List::<u32>::unpack(&mut cursor).unwrap();
    assert_eq!(read, written);
    assert_eq!(decoded.into_inner(), vec![7, 8]);
}

#[test]
fn long_list_decodes_iteratively() {
    // A list long enough to blow the stack if decode were recursive.
    let list = List((0..100_000u32).collect::<Vec<_>>());
    let mut buf = Vec::new();
    list.pack(&mut buf).unwrap();

    let mut cursor = Cursor::new(buf);
    let (decoded, _) = List::<u32>::unpack(&mut cursor).unwrap();
    assert_eq!(decoded.into_inner().len(), 100_000);
}

#[test]
fn void_is_zero_bytes() {
    let mut buf = Vec::new();
    assert_eq!(Void.pack(&mut buf).unwrap(), 0);
    assert!(buf.is_empty());
    assert_eq!(Void.packed_size(), 0);
}

#[test]
fn u32_vec_is_length_prefixed() {
    let v = vec![1u32, 2, 3];
    let mut buf = Vec::new();
    let written = v.pack(&mut buf).unwrap();
    assert_eq!(written, 16);
    assert_eq!(v.packed_size(), 16);
    assert_eq!(buf[..4], [0, 0, 0, 3]);

    let mut cursor = Cursor::new(buf);
    let (decoded, read) = Vec::<u32>::unpack(&mut cursor).unwrap();
    assert_eq!(read, 16);
    assert_eq!(decoded, v);
}
