use crate::common::MemoryBlockDevice;
use std::collections::HashMap;

pub const SECTOR: usize = 2048;

/// Content of a node in the image
#[derive(Debug, Clone)]
pub enum Kind {
    File(Vec<u8>),
    Dir(Vec<Node>),
}

/// One file or directory to lay out
#[derive(Debug, Clone)]
pub struct Node {
    pub id: Vec<u8>,
    pub kind: Kind,
    pub flags: u8,
    pub alternate_name: Option<Vec<u8>>,
    pub posix: Option<(u32, u32, u32)>,
}

impl Node {
    pub fn file(id: &str, content: &[u8]) -> Self {
        Self {
            id: id.as_bytes().to_vec(),
            kind: Kind::File(content.to_vec()),
            flags: 0x00,
            alternate_name: None,
            posix: None,
        }
    }

    pub fn dir(id: &str, children: Vec<Node>) -> Self {
        Self {
            id: id.as_bytes().to_vec(),
            kind: Kind::Dir(children),
            flags: 0x02,
            alternate_name: None,
            posix: None,
        }
    }

    /// Rock Ridge NM entry
    pub fn rock_ridge_name(mut self, name: &str) -> Self {
        self.alternate_name = Some(name.as_bytes().to_vec());
        self
    }

    /// Rock Ridge PX entry (POSIX mode, uid, gid)
    pub fn posix(mut self, mode: u32, uid: u32, gid: u32) -> Self {
        self.posix = Some((mode, uid, gid));
        self
    }

    pub fn flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    fn system_use(&self) -> Vec<u8> {
        let mut su = Vec::new();
        if self.alternate_name.is_none() && self.posix.is_none() {
            return su;
        }

        let mut rr_flags = 0u8;
        if self.posix.is_some() {
            rr_flags |= 0x01;
        }
        if self.alternate_name.is_some() {
            rr_flags |= 0x08;
        }
        su.extend_from_slice(&rr_entry(rr_flags));

        if let Some((mode, uid, gid)) = self.posix {
            su.extend_from_slice(&px_entry(mode, 1, uid, gid));
        }
        if let Some(name) = &self.alternate_name {
            su.extend_from_slice(&nm_entry(name));
        }
        su
    }

    fn record_len(&self) -> usize {
        encode_record(0, 0, self.flags, &self.id, &self.system_use()).len()
    }
}

/// Builds a complete image: PVD, terminator, directories, file data.
pub struct IsoBuilder {
    root: Vec<Node>,
    volume_space_size: Option<u32>,
    device_sectors: Option<usize>,
    leading_descriptors: u32,
}

/// Built image plus where each record landed
pub struct BuiltIso {
    pub data: Vec<u8>,
    /// Record offset (the inode) by path of ISO identifiers, e.g. "/DIR/A.TXT;1"
    pub records: HashMap<String, u64>,
    pub root_lba: u32,
}

impl BuiltIso {
    pub fn device(&self) -> MemoryBlockDevice {
        MemoryBlockDevice::new(self.data.clone())
    }

    pub fn inode(&self, path: &str) -> isofs::Inode {
        isofs::Inode(*self.records.get(path).unwrap_or_else(|| panic!("no record for {path}")))
    }
}

struct DirPlan<'a> {
    lba: u32,
    len: u32,
    children: Vec<ChildPlan<'a>>,
}

struct ChildPlan<'a> {
    node: &'a Node,
    lba: u32,
    len: u32,
    dir: Option<DirPlan<'a>>,
}

impl IsoBuilder {
    pub fn new() -> Self {
        Self {
            root: Vec::new(),
            volume_space_size: None,
            device_sectors: None,
            leading_descriptors: 0,
        }
    }

    pub fn add(&mut self, node: Node) -> &mut Self {
        self.root.push(node);
        self
    }

    pub fn add_file(&mut self, name: &str, content: &[u8]) -> &mut Self {
        self.add(Node::file(name, content))
    }

    /// Override the PVD volume space size (defaults to the sectors used)
    pub fn volume_space_size(&mut self, blocks: u32) -> &mut Self {
        self.volume_space_size = Some(blocks);
        self
    }

    /// Override the device length in sectors
    pub fn device_sectors(&mut self, sectors: usize) -> &mut Self {
        self.device_sectors = Some(sectors);
        self
    }

    /// Supplementary descriptors placed before the PVD
    pub fn leading_descriptors(&mut self, count: u32) -> &mut Self {
        self.leading_descriptors = count;
        self
    }

    pub fn build(&self) -> BuiltIso {
        let pvd_lba = 16 + self.leading_descriptors;
        let mut cursor = pvd_lba + 2;
        let root = plan(&self.root, &mut cursor);

        let vss = self.volume_space_size.unwrap_or(cursor);
        let sectors = self
            .device_sectors
            .unwrap_or_else(|| (cursor as usize).max(vss as usize));
        let mut data = vec![0u8; sectors * SECTOR];

        for i in 0..self.leading_descriptors {
            let off = (16 + i) as usize * SECTOR;
            data[off] = 2;
            data[off + 1..off + 6].copy_from_slice(b"CD001");
            data[off + 6] = 1;
        }

        // PVD
        let pvd = pvd_lba as usize * SECTOR;
        data[pvd] = 1; // Primary
        data[pvd + 1..pvd + 6].copy_from_slice(b"CD001");
        data[pvd + 6] = 1; // Version
        data[pvd + 40..pvd + 51].copy_from_slice(b"TEST VOLUME");
        write_both_endian_u32(&mut data[pvd + 80..], vss);
        write_both_endian_u16(&mut data[pvd + 128..], SECTOR as u16);
        let root_record = encode_record(root.lba, root.len, 0x02, &[0x00], &[]);
        data[pvd + 156..pvd + 156 + root_record.len()].copy_from_slice(&root_record);
        data[pvd + 881] = 1; // File structure version

        // Terminator
        let term = (pvd_lba + 1) as usize * SECTOR;
        data[term] = 255;
        data[term + 1..term + 6].copy_from_slice(b"CD001");
        data[term + 6] = 1;

        let mut records = HashMap::new();
        records.insert("/".to_string(), (pvd + 156) as u64);
        write_dir(&mut data, &root, (root.lba, root.len), "", &mut records);

        BuiltIso {
            data,
            records,
            root_lba: root.lba,
        }
    }
}

fn sectors_for(len: usize) -> u32 {
    len.div_ceil(SECTOR) as u32
}

fn dir_sectors(children: &[Node]) -> u32 {
    let mut sectors = 1;
    let mut pos = 0;
    let lens = [34, 34].into_iter().chain(children.iter().map(Node::record_len));
    for len in lens {
        if pos + len > SECTOR {
            sectors += 1;
            pos = 0;
        }
        pos += len;
    }
    sectors
}

fn plan<'a>(children: &'a [Node], cursor: &mut u32) -> DirPlan<'a> {
    let lba = *cursor;
    let sectors = dir_sectors(children);
    *cursor += sectors;

    let mut planned = Vec::new();
    for node in children {
        match &node.kind {
            Kind::File(content) => {
                let file_lba = *cursor;
                *cursor += sectors_for(content.len());
                planned.push(ChildPlan {
                    node,
                    lba: file_lba,
                    len: content.len() as u32,
                    dir: None,
                });
            }
            Kind::Dir(sub) => {
                let sub_plan = plan(sub, cursor);
                planned.push(ChildPlan {
                    node,
                    lba: sub_plan.lba,
                    len: sub_plan.len,
                    dir: Some(sub_plan),
                });
            }
        }
    }

    DirPlan {
        lba,
        len: sectors * SECTOR as u32,
        children: planned,
    }
}

fn write_dir(
    data: &mut [u8],
    dir: &DirPlan<'_>,
    parent: (u32, u32),
    path: &str,
    records: &mut HashMap<String, u64>,
) {
    let mut pos = dir.lba as usize * SECTOR;

    place(data, &mut pos, &encode_record(dir.lba, dir.len, 0x02, &[0x00], &[]));
    place(data, &mut pos, &encode_record(parent.0, parent.1, 0x02, &[0x01], &[]));

    for child in &dir.children {
        let node = child.node;
        let record = encode_record(child.lba, child.len, node.flags, &node.id, &node.system_use());
        let offset = place(data, &mut pos, &record);
        let child_path = format!("{}/{}", path, String::from_utf8_lossy(&node.id));
        records.insert(child_path.clone(), offset as u64);

        match (&node.kind, &child.dir) {
            (Kind::File(content), _) => {
                let off = child.lba as usize * SECTOR;
                data[off..off + content.len()].copy_from_slice(content);
            }
            (Kind::Dir(_), Some(sub)) => {
                write_dir(data, sub, (dir.lba, dir.len), &child_path, records)
            }
            (Kind::Dir(_), None) => unreachable!("directories are always planned"),
        }
    }
}

/// Copy a record at `pos`, skipping to the next sector if it would straddle one.
fn place(data: &mut [u8], pos: &mut usize, record: &[u8]) -> usize {
    if *pos % SECTOR + record.len() > SECTOR {
        *pos = (*pos / SECTOR + 1) * SECTOR;
    }
    let at = *pos;
    data[at..at + record.len()].copy_from_slice(record);
    *pos += record.len();
    at
}

pub fn write_both_endian_u32(dst: &mut [u8], value: u32) {
    dst[0..4].copy_from_slice(&value.to_le_bytes());
    dst[4..8].copy_from_slice(&value.to_be_bytes());
}

pub fn write_both_endian_u16(dst: &mut [u8], value: u16) {
    dst[0..2].copy_from_slice(&value.to_le_bytes());
    dst[2..4].copy_from_slice(&value.to_be_bytes());
}

/// Encode one directory record, padded to even length
pub fn encode_record(lba: u32, size: u32, flags: u8, id: &[u8], system_use: &[u8]) -> Vec<u8> {
    let mut rec = vec![0u8; 33];
    rec.extend_from_slice(id);
    if id.len() % 2 == 0 {
        rec.push(0); // Padding field
    }
    rec.extend_from_slice(system_use);
    if rec.len() % 2 != 0 {
        rec.push(0);
    }

    rec[0] = rec.len() as u8;
    write_both_endian_u32(&mut rec[2..], lba);
    write_both_endian_u32(&mut rec[10..], size);
    rec[25] = flags;
    write_both_endian_u16(&mut rec[28..], 1); // Volume seq
    rec[32] = id.len() as u8;
    rec
}

pub fn rr_entry(flags: u8) -> [u8; 5] {
    [b'R', b'R', 5, 1, flags]
}

pub fn nm_entry(name: &[u8]) -> Vec<u8> {
    let mut e = vec![b'N', b'M', 5 + name.len() as u8, 1, 0];
    e.extend_from_slice(name);
    e
}

pub fn px_entry(mode: u32, nlink: u32, uid: u32, gid: u32) -> Vec<u8> {
    let mut e = vec![b'P', b'X', 36, 1];
    for value in [mode, nlink, uid, gid] {
        let mut field = [0u8; 8];
        write_both_endian_u32(&mut field, value);
        e.extend_from_slice(&field);
    }
    e
}
