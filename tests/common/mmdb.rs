//! 最小化的 MaxMind DB 写入器
//!
//! 只覆盖测试需要的部分：IPv4 树、24 位记录、字符串/浮点/无符号整数/map/array。
//! 格式参考 MaxMind DB File Format Specification 2.0。

use std::net::Ipv4Addr;

const METADATA_MARKER: &[u8] = b"\xAB\xCD\xEFMaxMind.com";
const DATA_SECTION_SEPARATOR: usize = 16;

const TYPE_STRING: u8 = 2;
const TYPE_DOUBLE: u8 = 3;
const TYPE_UINT16: u8 = 5;
const TYPE_UINT32: u8 = 6;
const TYPE_MAP: u8 = 7;
const TYPE_UINT64: u8 = 9;
const TYPE_ARRAY: u8 = 11;

#[derive(Debug, Clone)]
pub enum Value {
    Str(String),
    Double(f64),
    U16(u16),
    U32(u32),
    U64(u64),
    Map(Vec<(String, Value)>),
    Array(Vec<Value>),
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(s.to_string())
    }

    pub fn map<const N: usize>(entries: [(&str, Value); N]) -> Self {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }
}

fn write_control(out: &mut Vec<u8>, type_num: u8, size: usize) {
    let (size_bits, extra): (u8, Vec<u8>) = if size < 29 {
        (size as u8, Vec::new())
    } else if size < 29 + 256 {
        (29, vec![(size - 29) as u8])
    } else if size < 285 + 65536 {
        (30, ((size - 285) as u16).to_be_bytes().to_vec())
    } else {
        panic!("fixture value too large: {}", size);
    };

    if type_num <= 7 {
        out.push((type_num << 5) | size_bits);
    } else {
        out.push(size_bits);
        out.push(type_num - 7);
    }
    out.extend_from_slice(&extra);
}

fn write_uint(out: &mut Vec<u8>, type_num: u8, value: u64) {
    let bytes = value.to_be_bytes();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let payload = &bytes[first..];
    write_control(out, type_num, payload.len());
    out.extend_from_slice(payload);
}

fn encode(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Str(s) => {
            write_control(out, TYPE_STRING, s.len());
            out.extend_from_slice(s.as_bytes());
        }
        Value::Double(f) => {
            write_control(out, TYPE_DOUBLE, 8);
            out.extend_from_slice(&f.to_be_bytes());
        }
        Value::U16(v) => write_uint(out, TYPE_UINT16, u64::from(*v)),
        Value::U32(v) => write_uint(out, TYPE_UINT32, u64::from(*v)),
        Value::U64(v) => write_uint(out, TYPE_UINT64, *v),
        Value::Map(entries) => {
            write_control(out, TYPE_MAP, entries.len());
            for (key, value) in entries {
                encode(&Value::Str(key.clone()), out);
                encode(value, out);
            }
        }
        Value::Array(items) => {
            write_control(out, TYPE_ARRAY, items.len());
            for item in items {
                encode(item, out);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Record {
    Empty,
    Node(usize),
    Data(usize),
}

/// IPv4-only 数据库构造器
pub struct MmdbBuilder {
    database_type: String,
    build_epoch: u64,
    nodes: Vec<[Record; 2]>,
    data: Vec<u8>,
}

impl MmdbBuilder {
    pub fn new(database_type: &str, build_epoch: u64) -> Self {
        Self {
            database_type: database_type.to_string(),
            build_epoch,
            nodes: vec![[Record::Empty, Record::Empty]],
            data: Vec::new(),
        }
    }

    /// 插入一个网段；网段之间不能互相包含
    pub fn insert(&mut self, network: Ipv4Addr, prefix_len: u8, value: &Value) -> &mut Self {
        assert!((1..=32).contains(&prefix_len));

        let offset = self.data.len();
        encode(value, &mut self.data);

        let bits = u32::from(network);
        let mut current = 0;
        for depth in 0..prefix_len {
            let bit = ((bits >> (31 - depth)) & 1) as usize;
            if depth == prefix_len - 1 {
                self.nodes[current][bit] = Record::Data(offset);
                break;
            }
            current = match self.nodes[current][bit] {
                Record::Node(next) => next,
                Record::Empty => {
                    self.nodes.push([Record::Empty, Record::Empty]);
                    let next = self.nodes.len() - 1;
                    self.nodes[current][bit] = Record::Node(next);
                    next
                }
                Record::Data(_) => panic!("overlapping fixture networks"),
            };
        }
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let node_count = self.nodes.len();
        let mut out = Vec::new();

        for node in &self.nodes {
            for record in node {
                let value = match *record {
                    Record::Empty => node_count,
                    Record::Node(next) => next,
                    Record::Data(offset) => node_count + DATA_SECTION_SEPARATOR + offset,
                };
                assert!(value < (1 << 24), "record does not fit in 24 bits");
                out.extend_from_slice(&(value as u32).to_be_bytes()[1..]);
            }
        }

        out.extend_from_slice(&[0u8; DATA_SECTION_SEPARATOR]);
        out.extend_from_slice(&self.data);

        out.extend_from_slice(METADATA_MARKER);
        let metadata = Value::map([
            ("binary_format_major_version", Value::U16(2)),
            ("binary_format_minor_version", Value::U16(0)),
            ("build_epoch", Value::U64(self.build_epoch)),
            ("database_type", Value::str(&self.database_type)),
            (
                "description",
                Value::map([("en", Value::str("ipinfo test fixture"))]),
            ),
            ("ip_version", Value::U16(4)),
            (
                "languages",
                Value::Array(vec![Value::str("en"), Value::str("zh-CN")]),
            ),
            ("node_count", Value::U32(node_count as u32)),
            ("record_size", Value::U16(24)),
        ]);
        encode(&metadata, &mut out);

        out
    }
}
