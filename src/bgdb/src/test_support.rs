//! Synthetic buffer builders for unit tests

/// Opaque per-field header size between the name and the payload size
const HEADER_LEN: usize = 31;

/// Inter-field gap (type marker + GUID)
const GAP_LEN: usize = 22;

/// Encode one field: `[name_len][name][31-byte header][size][payload]`
pub fn field(name: &str, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(name.len() as u32).to_le_bytes());
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(&[0xee; HEADER_LEN]);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Append fields with the standard gap, returning each field's offset
pub fn fields(parts: &[(&str, Vec<u8>)]) -> (Vec<u8>, Vec<usize>) {
    let mut out = Vec::new();
    let mut offsets = Vec::new();
    for (name, payload) in parts {
        offsets.push(out.len());
        out.extend(field(name, payload));
        out.extend_from_slice(&[0u8; GAP_LEN]);
    }
    (out, offsets)
}

pub fn i32_payload(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

pub fn f32_payload(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Rank payload: embedded count followed by `(filler, rank)` int32 pairs
pub fn rank_payload(ranks: &[i32]) -> Vec<u8> {
    let mut out = (ranks.len() as u32).to_le_bytes().to_vec();
    for (i, rank) in ranks.iter().enumerate() {
        out.extend_from_slice(&(i as i32).to_le_bytes());
        out.extend_from_slice(&rank.to_le_bytes());
    }
    out
}

/// Nested array payload; `order` gives the index-table order of row ids
pub fn nested_payload(rows: &[Vec<u8>], order: &[u32]) -> Vec<u8> {
    let mut blob = Vec::new();
    let mut offsets = Vec::new();
    for row in rows {
        offsets.push(blob.len() as u32);
        blob.extend_from_slice(row);
    }

    let mut out = (order.len() as u32).to_le_bytes().to_vec();
    for &row_id in order {
        out.extend_from_slice(&row_id.to_le_bytes());
        out.extend_from_slice(&offsets[row_id as usize].to_le_bytes());
    }
    out.extend(blob);
    out
}

/// Offset/blob block shared by the string table and dictionary blocks
///
/// Entries are written in the given order; offsets follow that order.
pub fn offset_block(entries: &[(u32, &str)]) -> Vec<u8> {
    let mut blob = Vec::new();
    let mut pairs = Vec::new();
    for (key, text) in entries {
        pairs.push((*key, blob.len() as u32));
        blob.extend_from_slice(text.as_bytes());
    }

    let mut out = (blob.len() as u32).to_le_bytes().to_vec();
    out.extend_from_slice(&(pairs.len() as u32).to_le_bytes());
    for (key, offset) in pairs {
        out.extend_from_slice(&key.to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
    }
    out.extend(blob);
    out
}

/// Name map: entry count followed by `(row_id, string_id)` pairs
pub fn name_map(entries: &[(u32, u32)]) -> Vec<u8> {
    let mut out = (entries.len() as u32).to_le_bytes().to_vec();
    for (row, sid) in entries {
        out.extend_from_slice(&row.to_le_bytes());
        out.extend_from_slice(&sid.to_le_bytes());
    }
    out
}

/// Length-prefixed probe marker
pub fn probe(text: &str) -> Vec<u8> {
    crate::bytes::length_prefixed(text)
}

/// Localization from `(key, text)` pairs with sequential ids
pub fn localization(entries: &[(&str, &str)]) -> crate::Localization {
    let keys = entries
        .iter()
        .enumerate()
        .map(|(id, (key, _))| (id as u32, key.to_string()))
        .collect();
    let texts = entries
        .iter()
        .enumerate()
        .map(|(id, (_, text))| (id as u32, text.to_string()))
        .collect();
    crate::Localization::from_maps(keys, texts)
}

/// Run `f` with a debug-level subscriber and return everything it logged
pub fn capture_logs(f: impl FnOnce()) -> String {
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let buffer = Buffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}
