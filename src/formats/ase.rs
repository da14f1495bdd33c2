//! Adobe Swatch Exchange (`.ase`).
//!
//! The file is a header (`ASEF`, version 1.0, number of blocks) followed
//! by a flat sequence of blocks, each made of a `u16` type, a `u32`
//! length and the block data.  Groups are delimited by group start and
//! group end blocks; they cannot be nested.  All numbers are big-endian
//! and strings are UTF-16BE prefixed by their length in code units,
//! terminating NUL included.

use log::{trace, warn};
use crate::coder::{expect_palette, Coder, Model, ModelKind};
use crate::color::{Color, ColorSpace, ColorType};
use crate::error::{Error, Result};
use crate::io::{ByteReader, ByteWriter};
use crate::palette::{Group, Palette};

const MAGIC: &[u8; 4] = b"ASEF";
const VERSION: (u16, u16) = (1, 0);

const GROUP_START: u16 = 0xC001;
const GROUP_END: u16 = 0xC002;
const COLOR_ENTRY: u16 = 0x0001;

fn space_of_tag(tag: [u8; 4]) -> Result<ColorSpace> {
    match &tag {
        b"CMYK" => Ok(ColorSpace::Cmyk),
        b"RGB " => Ok(ColorSpace::Rgb),
        b"LAB " => Ok(ColorSpace::Lab),
        b"Gray" => Ok(ColorSpace::Gray),
        _ => Err(Error::UnknownTag { what: "colorspace",
                                     tag: u32::from_be_bytes(tag) }),
    }
}

fn tag_of_space(space: ColorSpace) -> &'static [u8; 4] {
    match space {
        ColorSpace::Cmyk => b"CMYK",
        ColorSpace::Rgb => b"RGB ",
        ColorSpace::Lab => b"LAB ",
        ColorSpace::Gray => b"Gray",
    }
}

fn color_type_of_code(code: u16) -> Result<ColorType> {
    match code {
        0 => Ok(ColorType::Global),
        1 => Ok(ColorType::Spot),
        2 => Ok(ColorType::Normal),
        _ => Err(Error::UnknownTag { what: "color type", tag: code as u32 }),
    }
}

fn code_of_color_type(t: ColorType) -> u16 {
    match t {
        ColorType::Global => 0,
        ColorType::Spot => 1,
        ColorType::Normal => 2,
    }
}

/// A decoded block.
#[derive(Debug)]
enum Block {
    GroupStart(String),
    GroupEnd,
    Color(Color),
}

fn read_block(s: &mut ByteReader<'_>) -> Result<Block> {
    let offset = s.position();
    let kind = s.read_u16_be()?;
    let len = s.read_u32_be()? as usize;
    let mut data = ByteReader::new(s.read_bytes(len)?);
    trace!("ase: block {kind:#06x} of {len} bytes at offset {offset}");
    let block = match kind {
        GROUP_START => Block::GroupStart(data.read_pascal_utf16_be_u16()?),
        GROUP_END => Block::GroupEnd,
        COLOR_ENTRY => {
            let name = data.read_pascal_utf16_be_u16()?;
            let space = space_of_tag(data.read_tag()?)?;
            let components = (0 .. space.component_count())
                .map(|_| data.read_f32_be().map(|x| x as f64))
                .collect::<Result<Vec<_>>>()?;
            let color_type = color_type_of_code(data.read_u16_be()?)?;
            Block::Color(Color::new(name, space, components, color_type, 1.)?)
        }
        _ => return Err(Error::UnknownTag { what: "block", tag: kind as u32 }),
    };
    if !data.is_at_end() {
        return Err(Error::invalid(format!(
            "{} unread bytes in block at offset {offset}", data.remaining())))
    }
    Ok(block)
}

/// Where the block sequence stands with respect to groups.
#[derive(Debug)]
enum State {
    Idle,
    InsideGroup(Group),
}

impl State {
    /// Feed `block` to the state machine, appending finished groups and
    /// ungrouped colors to `palette`.
    fn next(self, block: Block, palette: &mut Palette) -> Result<State> {
        match (self, block) {
            (State::Idle, Block::GroupStart(name)) =>
                Ok(State::InsideGroup(Group::new(name, vec![]))),
            (State::InsideGroup(_), Block::GroupStart(_)) =>
                Err(Error::GroupAlreadyOpen),
            (State::InsideGroup(group), Block::GroupEnd) => {
                palette.groups.push(group);
                Ok(State::Idle)
            }
            (State::Idle, Block::GroupEnd) => Err(Error::GroupNotOpen),
            (State::InsideGroup(mut group), Block::Color(c)) => {
                group.colors.push(c);
                Ok(State::InsideGroup(group))
            }
            (State::Idle, Block::Color(c)) => {
                palette.colors.push(c);
                Ok(State::Idle)
            }
        }
    }
}

/// Coder for Adobe Swatch Exchange files.
#[derive(Clone, Copy, Debug, Default)]
pub struct AseCoder;

impl Coder for AseCoder {
    fn name(&self) -> &'static str { "ase" }

    fn extensions(&self) -> &'static [&'static str] { &["ase"] }

    fn kind(&self) -> ModelKind { ModelKind::Palette }

    fn decode_stream(&self, s: &mut ByteReader<'_>) -> Result<Model> {
        s.expect_magic(MAGIC)?;
        let version = (s.read_u16_be()?, s.read_u16_be()?);
        if version != VERSION {
            return Err(Error::UnsupportedVersion(
                format!("{}.{}", version.0, version.1)))
        }
        let blocks = s.read_u32_be()?;
        let mut palette = Palette::new();
        let mut state = State::Idle;
        for _ in 0 .. blocks {
            state = state.next(read_block(s)?, &mut palette)?;
        }
        if let State::InsideGroup(_) = state {
            return Err(Error::UnterminatedGroup)
        }
        if !s.is_at_end() {
            return Err(Error::invalid(format!(
                "{} bytes after the last block", s.remaining())))
        }
        Ok(palette.with_format(self.name()).into())
    }

    fn encode(&self, model: &Model) -> Result<Vec<u8>> {
        let palette = expect_palette(self, model)?;
        if palette.all_colors().any(|c| c.alpha() != 1.) {
            warn!("ase: color opacity is not supported and was dropped");
        }
        let blocks = palette.colors.len()
            + palette.groups.iter().map(|g| g.colors.len() + 2).sum::<usize>();
        let blocks = u32::try_from(blocks).map_err(|_| Error::invalid(format!(
            "ase: {blocks} blocks, at most {} can be stored", u32::MAX)))?;
        let mut w = ByteWriter::new();
        w.write_bytes(MAGIC);
        w.write_u16_be(VERSION.0);
        w.write_u16_be(VERSION.1);
        w.write_u32_be(blocks);
        for c in &palette.colors {
            write_color(&mut w, c)?;
        }
        for g in &palette.groups {
            let mut data = ByteWriter::new();
            data.write_pascal_utf16_be_u16(&g.name)?;
            write_block(&mut w, GROUP_START, &data.into_inner())?;
            for c in &g.colors {
                write_color(&mut w, c)?;
            }
            write_block(&mut w, GROUP_END, &[])?;
        }
        Ok(w.into_inner())
    }
}

fn write_block(w: &mut ByteWriter, kind: u16, data: &[u8]) -> Result<()> {
    let len = u32::try_from(data.len()).map_err(|_| Error::invalid(format!(
        "ase: block of {} bytes is too long", data.len())))?;
    w.write_u16_be(kind);
    w.write_u32_be(len);
    w.write_bytes(data);
    Ok(())
}

fn write_color(w: &mut ByteWriter, c: &Color) -> Result<()> {
    let mut data = ByteWriter::new();
    data.write_pascal_utf16_be_u16(c.name())?;
    data.write_bytes(tag_of_space(c.space()));
    for &x in c.components() {
        data.write_f32_be(x as f32);
    }
    data.write_u16_be(code_of_color_type(c.color_type()));
    write_block(w, COLOR_ENTRY, &data.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(blocks: u32) -> ByteWriter {
        let mut w = ByteWriter::new();
        w.write_bytes(b"ASEF");
        w.write_u16_be(1);
        w.write_u16_be(0);
        w.write_u32_be(blocks);
        w
    }

    fn group_start(w: &mut ByteWriter, name: &str) {
        let mut d = ByteWriter::new();
        d.write_pascal_utf16_be_u16(name).unwrap();
        write_block(w, GROUP_START, &d.into_inner()).unwrap();
    }

    #[test]
    fn byte_layout_of_one_color() {
        let c = Color::rgb(1., 0., 0.).with_name("R");
        let bytes = AseCoder.encode(&Palette::named("", vec![c]).into()).unwrap();
        let mut expected = b"ASEF".to_vec();
        expected.extend_from_slice(&[0, 1, 0, 0, 0, 0, 0, 1]);
        expected.extend_from_slice(&[0x00, 0x01, 0, 0, 0, 24]); // color block
        expected.extend_from_slice(&[0, 2, 0, b'R', 0, 0]);      // name
        expected.extend_from_slice(b"RGB ");
        expected.extend_from_slice(&[0x3F, 0x80, 0, 0]);         // 1.0
        expected.extend_from_slice(&[0; 8]);                     // 0.0, 0.0
        expected.extend_from_slice(&[0, 0]);                     // global
        assert_eq!(bytes, expected);
    }

    #[test]
    fn groups_round_trip() {
        let mut p = Palette::named("", vec![Color::gray(0.5).with_name("mid")]);
        p.groups.push(Group::new("Brand", vec![
            Color::cmyk(0., 0.5, 1., 0.).with_name("orange")
                .with_color_type(ColorType::Spot),
            Color::lab(50., -20., 30.).with_color_type(ColorType::Normal)]));
        p.groups.push(Group::new("", vec![]));
        let bytes = AseCoder.encode(&p.clone().into()).unwrap();
        let back = AseCoder.decode_palette(&bytes).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.format, Some("ase"));
    }

    #[test]
    fn group_end_without_start() {
        let mut w = header(1);
        write_block(&mut w, GROUP_END, &[]).unwrap();
        assert!(matches!(AseCoder.decode(&w.into_inner()),
                         Err(Error::GroupNotOpen)));
    }

    #[test]
    fn nested_group_start() {
        let mut w = header(2);
        group_start(&mut w, "a");
        group_start(&mut w, "b");
        assert!(matches!(AseCoder.decode(&w.into_inner()),
                         Err(Error::GroupAlreadyOpen)));
    }

    #[test]
    fn unterminated_group() {
        let mut w = header(1);
        group_start(&mut w, "a");
        assert!(matches!(AseCoder.decode(&w.into_inner()),
                         Err(Error::UnterminatedGroup)));
    }

    #[test]
    fn state_machine_transitions() {
        let mut p = Palette::new();
        let s = State::Idle.next(Block::Color(Color::gray(0.)), &mut p).unwrap();
        let s = s.next(Block::GroupStart("g".into()), &mut p).unwrap();
        let s = s.next(Block::Color(Color::gray(1.)), &mut p).unwrap();
        assert!(matches!(s, State::InsideGroup(_)));
        let s = s.next(Block::GroupEnd, &mut p).unwrap();
        assert!(matches!(s, State::Idle));
        assert_eq!(p.colors, [Color::gray(0.)]);
        assert_eq!(p.groups, [Group::new("g", vec![Color::gray(1.)])]);
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(matches!(AseCoder.decode(b"ASEX\0\x01\0\0\0\0\0\0"),
                         Err(Error::InvalidMagic { .. })));
        let mut w = ByteWriter::new();
        w.write_bytes(b"ASEF");
        w.write_u16_be(2);
        w.write_u16_be(0);
        w.write_u32_be(0);
        assert!(matches!(AseCoder.decode(&w.into_inner()),
                         Err(Error::UnsupportedVersion(_))));
        // Announces one block but has none.
        assert!(matches!(AseCoder.decode(&header(1).into_inner()),
                         Err(Error::UnexpectedEof { .. })));
    }

    #[test]
    fn rejects_unknown_tags() {
        let mut w = header(1);
        write_block(&mut w, 0xC003, &[]).unwrap();
        assert!(matches!(AseCoder.decode(&w.into_inner()),
                         Err(Error::UnknownTag { what: "block", .. })));

        let mut d = ByteWriter::new();
        d.write_pascal_utf16_be_u16("x").unwrap();
        d.write_bytes(b"HSV ");
        let mut w = header(1);
        write_block(&mut w, COLOR_ENTRY, &d.into_inner()).unwrap();
        assert!(matches!(AseCoder.decode(&w.into_inner()),
                         Err(Error::UnknownTag { what: "colorspace", .. })));
    }

    #[test]
    fn overlong_name_is_not_written() {
        let name = "n".repeat(70_000);
        let p = Palette::named("", vec![Color::gray(0.).with_name(name)]);
        assert!(matches!(AseCoder.encode(&p.into()), Err(Error::InvalidData(_))));
        let mut p = Palette::new();
        p.groups.push(Group::new("g".repeat(65_535), vec![]));
        assert!(matches!(AseCoder.encode(&p.into()), Err(Error::InvalidData(_))));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let p = Palette::named("", vec![Color::gray(0.5)]);
        let mut bytes = AseCoder.encode(&p.into()).unwrap();
        bytes.push(0);
        assert!(matches!(AseCoder.decode(&bytes), Err(Error::InvalidData(_))));
    }

    #[test]
    fn rejects_gradients() {
        let m = Model::Gradients(Default::default());
        assert!(matches!(AseCoder.encode(&m),
                         Err(Error::UnsupportedModel { coder: "ase", .. })));
    }
}
