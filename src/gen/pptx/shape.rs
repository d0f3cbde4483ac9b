//! Slide contents, as DrawingML text boxes.

use std::{borrow::Cow, fmt::Write};

use smart_default::SmartDefault;

use crate::{
    gen::{OutputGenerator, Res},
    util::Escaped,
};

use super::parts::{NAMESPACES, XML_HEADER};

pub const EMU_PER_HUNDREDTH_INCH: i64 = 9144;
/// 13.33 by 7.5 inches
pub const SLIDE_WIDTH: i64 = 12_192_000;
pub const SLIDE_HEIGHT: i64 = 6_858_000;

/// Length in EMU, from hundredths of an inch
pub const fn inches(hundredths: i64) -> i64 {
    hundredths * EMU_PER_HUNDREDTH_INCH
}

/// Position and size, in EMU
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn attribute(self) -> &'static str {
        match self {
            Align::Left => "l",
            Align::Center => "ctr",
            Align::Right => "r",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Middle,
    Bottom,
}

impl Anchor {
    fn attribute(self) -> &'static str {
        match self {
            Anchor::Top => "t",
            Anchor::Middle => "ctr",
            Anchor::Bottom => "b",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStyle<'s> {
    pub font: &'s str,
    /// Points
    pub size: u32,
    pub bold: bool,
    pub color: &'s str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph<'t> {
    pub text: Cow<'t, str>,
    pub style: RunStyle<'t>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBox<'t> {
    pub name: &'static str,
    pub frame: Frame,
    pub align: Align,
    pub anchor: Anchor,
    /// Exact line spacing, in points
    pub line_spacing: Option<u32>,
    pub paragraphs: Vec<Paragraph<'t>>,
}

/// Shape ids of a single slide; `1` belongs to the shape tree itself
#[derive(Debug, SmartDefault)]
pub struct Context {
    #[default = 2]
    next_id: u32,
}

impl Context {
    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

pub(super) const SHAPE_TREE_HEAD: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

/// Writes text boxes as `p:sp` elements
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawingMl;

impl DrawingMl {
    fn write_paragraph<W: Write + ?Sized>(
        &self,
        output: &mut W,
        shape: &TextBox<'_>,
        paragraph: &Paragraph<'_>,
    ) -> Res {
        write!(output, r#"<a:p><a:pPr algn="{}">"#, shape.align.attribute())?;
        if let Some(spacing) = shape.line_spacing {
            write!(
                output,
                r#"<a:lnSpc><a:spcPts val="{}"/></a:lnSpc>"#,
                spacing * 100
            )?;
        }
        output.write_str("</a:pPr>")?;
        let RunStyle {
            font,
            size,
            bold,
            color,
        } = paragraph.style;
        write!(
            output,
            r#"<a:r><a:rPr lang="ko-KR" altLang="en-US" sz="{}" b="{}" dirty="0"><a:solidFill><a:srgbClr val="{color}"/></a:solidFill><a:latin typeface="{font}"/><a:ea typeface="{font}"/><a:cs typeface="{font}"/></a:rPr><a:t>{}</a:t></a:r></a:p>"#,
            size * 100,
            u8::from(bold),
            Escaped(&paragraph.text),
            font = Escaped(font),
        )?;
        Ok(())
    }
}

impl<'t> OutputGenerator<TextBox<'t>, Context> for DrawingMl {
    fn write_to<W: Write + ?Sized>(
        &self,
        output: &mut W,
        context: &mut Context,
        shape: &TextBox<'t>,
    ) -> Res {
        let id = context.next_id();
        let Frame {
            x,
            y,
            width,
            height,
        } = shape.frame;
        write!(
            output,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{} {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{width}" cy="{height}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square" rtlCol="0" anchor="{}"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#,
            shape.name,
            shape.anchor.attribute(),
        )?;
        if shape.paragraphs.is_empty() {
            // a text body needs at least one paragraph
            output.write_str("<a:p/>")?;
        }
        for paragraph in &shape.paragraphs {
            self.write_paragraph(output, shape, paragraph)?;
        }
        output.write_str("</p:txBody></p:sp>")?;
        Ok(())
    }
}

/// Writes a whole slide part
pub fn write_slide<W: Write + ?Sized>(output: &mut W, background: &str, shapes: &[TextBox<'_>]) -> Res {
    write!(
        output,
        r#"{XML_HEADER}<p:sld {NAMESPACES}><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="{background}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree>{SHAPE_TREE_HEAD}"#
    )?;
    DrawingMl.write_parts_to(output, &mut Context::default(), shapes)?;
    output.write_str("</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_box(text: &str) -> TextBox<'_> {
        TextBox {
            name: "Body",
            frame: Frame {
                x: inches(30),
                y: inches(100),
                width: inches(1000),
                height: inches(500),
            },
            align: Align::Left,
            anchor: Anchor::Top,
            line_spacing: Some(28),
            paragraphs: vec![Paragraph {
                text: Cow::Borrowed(text),
                style: RunStyle {
                    font: "Arial",
                    size: 18,
                    bold: false,
                    color: "000000",
                },
            }],
        }
    }

    #[test]
    fn emu() {
        assert_eq!(inches(100), 914_400);
        assert_eq!(inches(1333) + 3048, SLIDE_WIDTH);
        assert_eq!(inches(750), SLIDE_HEIGHT);
    }

    #[test]
    fn text_box_markup() {
        // arrange
        let shape = text_box("1 태초에 <하나님이>");
        let mut output = String::new();

        // act
        DrawingMl
            .write_to(&mut output, &mut Context::default(), &shape)
            .expect("Should write");

        // assert
        assert!(output.starts_with(r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Body 2"/>"#));
        assert!(output.contains(r#"<a:off x="274320" y="914400"/>"#));
        assert!(output.contains(r#"<a:pPr algn="l"><a:lnSpc><a:spcPts val="2800"/></a:lnSpc></a:pPr>"#));
        assert!(output.contains(r#"sz="1800" b="0""#));
        assert!(output.contains("<a:t>1 태초에 &lt;하나님이&gt;</a:t>"));
        assert!(output.ends_with("</p:txBody></p:sp>"));
    }

    #[test]
    fn shape_ids_increase_within_slide() {
        let shapes = [text_box("a"), text_box("b"), text_box("c")];
        let mut output = String::new();

        write_slide(&mut output, "FFFFFF", &shapes).expect("Should write");

        for id in 2..=4 {
            assert!(output.contains(&format!(r#"<p:cNvPr id="{id}" name="Body {id}"/>"#)));
        }
        assert!(!output.contains(r#"id="5""#));
        assert!(output.contains(r#"<a:srgbClr val="FFFFFF"/>"#));
    }

    #[test]
    fn empty_text_box_still_has_paragraph() {
        let mut shape = text_box("");
        shape.paragraphs.clear();
        let mut output = String::new();

        DrawingMl
            .write_to(&mut output, &mut Context::default(), &shape)
            .expect("Should write");

        assert!(output.contains("<a:lstStyle/><a:p/></p:txBody>"));
    }
}
