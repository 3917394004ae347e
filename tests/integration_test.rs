use esm_endian::converter::{convert, ConvertOptions};
use esm_endian::error::Error;
use esm_endian::model::RecordHeader;
use esm_endian::scanner::scan_records;
use pretty_assertions::assert_eq;

fn push_record_header(bytes: &mut Vec<u8>, sig: &[u8; 4], data_size: u32, flags: u32, form_id: u32) {
    bytes.extend_from_slice(sig);
    bytes.extend_from_slice(&data_size.to_be_bytes());
    bytes.extend_from_slice(&flags.to_be_bytes());
    bytes.extend_from_slice(&form_id.to_be_bytes());
    bytes.extend_from_slice(&0u32.to_be_bytes()); // revision
    bytes.extend_from_slice(&0x2Cu16.to_be_bytes()); // version
    bytes.extend_from_slice(&0u16.to_be_bytes()); // unknown
}

fn push_subrecord(bytes: &mut Vec<u8>, sig: &[u8; 4], data: &[u8]) {
    bytes.extend_from_slice(sig);
    bytes.extend_from_slice(&(data.len() as u16).to_be_bytes());
    bytes.extend_from_slice(data);
}

/// A minimal TES4 header: just an `HEDR` subrecord, no masters.
fn tes4_header_payload(num_records: u32) -> Vec<u8> {
    let mut payload = Vec::new();
    let mut hedr = Vec::new();
    hedr.extend_from_slice(&1.7f32.to_bits().to_be_bytes());
    hedr.extend_from_slice(&num_records.to_be_bytes());
    hedr.extend_from_slice(&0u32.to_be_bytes());
    push_subrecord(&mut payload, b"HEDR", &hedr);
    payload
}

fn build_minimal_plugin(num_records: u32, land_form_id: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    let tes4_payload = tes4_header_payload(num_records);
    push_record_header(&mut bytes, b"TES4", tes4_payload.len() as u32, 0, 0);
    bytes.extend_from_slice(&tes4_payload);

    // One CELL GRUP containing a single LAND record with a DATA subrecord.
    let mut land_payload = Vec::new();
    push_subrecord(&mut land_payload, b"DATA", &[0x00, 0x00, 0x00, 0x07]);

    let mut grup_children = Vec::new();
    push_record_header(&mut grup_children, b"LAND", land_payload.len() as u32, 0, land_form_id);
    grup_children.extend_from_slice(&land_payload);

    let group_size = (RecordHeader::SIZE + grup_children.len()) as u32;
    bytes.extend_from_slice(b"GRUP");
    bytes.extend_from_slice(&group_size.to_be_bytes());
    bytes.extend_from_slice(b"CELL"); // label (group type 0: raw signature)
    bytes.extend_from_slice(&0i32.to_be_bytes()); // groupType
    bytes.extend_from_slice(&0u32.to_be_bytes()); // stamp
    bytes.extend_from_slice(&0u32.to_be_bytes()); // unknown
    bytes.extend_from_slice(&grup_children);

    bytes
}

#[test]
fn converts_minimal_plugin_preserving_length() {
    let input = build_minimal_plugin(1, 0x0001_0001);
    let options = ConvertOptions::default();
    let (output, stats) = convert(&input, &options).unwrap();

    assert_eq!(output.len(), input.len());
    assert_eq!(stats.records_converted, 2); // TES4 + LAND
    assert_eq!(stats.grups_converted, 1);
    assert_eq!(&output[0..4], b"TES4");

    let header = esm_endian::parser::parse_file_header(&output).unwrap();
    assert!(!header.is_big_endian);
}

#[test]
fn scan_records_is_read_only_and_matches_converted_topology() {
    let input = build_minimal_plugin(1, 0x0001_0001);
    let descriptors = scan_records(&input).unwrap();
    assert_eq!(descriptors.len(), 3); // TES4, GRUP, LAND
    assert!(descriptors[1].is_grup);
    assert_eq!(descriptors[2].signature, *b"LAND");
}

#[test]
fn skip_type_collapses_empty_grup_and_repairs_hedr() {
    let input = build_minimal_plugin(1, 0x0001_0001);
    let mut options = ConvertOptions::default();
    options.skip_record_types.insert(*b"LAND");

    let (output, stats) = convert(&input, &options).unwrap();
    assert!(output.len() < input.len());
    assert_eq!(stats.records_skipped, 1);

    // Only the TES4 record should remain; the GRUP collapsed entirely.
    let tes4_span = RecordHeader::SIZE + tes4_header_payload(1).len();
    assert_eq!(output.len(), tes4_span);

    let hedr_num_records_offset = RecordHeader::SIZE + 6 + 4; // sig+size header, then f32 version
    let repaired = u32::from_le_bytes([
        output[hedr_num_records_offset],
        output[hedr_num_records_offset + 1],
        output[hedr_num_records_offset + 2],
        output[hedr_num_records_offset + 3],
    ]);
    assert_eq!(repaired, 0);
}

#[test]
fn skip_land_by_form_id_keeps_sibling_records() {
    let mut input = build_minimal_plugin(2, 0x0001_0001);
    // Append a second LAND record directly (outside any GRUP) so one
    // survives the skip while the other does not.
    let mut second_payload = Vec::new();
    push_subrecord(&mut second_payload, b"DATA", &[0x00, 0x00, 0x00, 0x09]);
    push_record_header(&mut input, b"LAND", second_payload.len() as u32, 0, 0x0002_0002);
    input.extend_from_slice(&second_payload);

    let mut options = ConvertOptions::default();
    options.skip_form_ids.insert(0x0001_0001);

    let (output, stats) = convert(&input, &options).unwrap();
    assert_eq!(stats.records_skipped, 1);
    assert!(output.len() < input.len());
}

#[test]
fn rejects_already_little_endian_file() {
    let mut input = Vec::new();
    input.extend_from_slice(b"TES4");
    input.extend_from_slice(&0u32.to_le_bytes());
    input.extend_from_slice(&0u32.to_le_bytes());
    input.extend_from_slice(&0u32.to_le_bytes());
    input.extend_from_slice(&0u32.to_le_bytes());
    input.extend_from_slice(&0x2Cu16.to_le_bytes());
    input.extend_from_slice(&0u16.to_le_bytes());

    let err = convert(&input, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, Error::WrongEndian { .. }));
}

#[test]
fn round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("plugin.esm");
    let output_path = dir.path().join("plugin.pc.esm");

    let input = build_minimal_plugin(1, 0x0001_0001);
    std::fs::write(&input_path, &input).unwrap();

    let bytes = std::fs::read(&input_path).unwrap();
    let (output, _stats) = convert(&bytes, &ConvertOptions::default()).unwrap();
    std::fs::write(&output_path, &output).unwrap();

    let written = std::fs::read(&output_path).unwrap();
    assert_eq!(written.len(), input.len());
}
