//! Package parts surrounding the slides: content types, relationships, properties, master, layout and theme.
//!
//! Every deck carries a single master, a single blank layout and a single theme.

use std::fmt::Write;

use crate::{
    gen::Res,
    options::{Palette, Theme},
    util::Escaped,
};

use super::shape::{SHAPE_TREE_HEAD, SLIDE_HEIGHT, SLIDE_WIDTH};

pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";
pub const NAMESPACES: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const OFFICE_RELATIONSHIP: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PRESENTATIONML: &str = "application/vnd.openxmlformats-officedocument.presentationml";

const FIRST_SLIDE_ID: usize = 256;
/// Relationship ids of the presentation part taken before the slides: master and theme
const RESERVED_PRESENTATION_RELATIONSHIPS: usize = 2;

pub const APPLICATION: &str = "bible2ppt";

pub fn slide_part(number: usize) -> String {
    format!("ppt/slides/slide{number}.xml")
}

pub fn slide_relationships_part(number: usize) -> String {
    format!("ppt/slides/_rels/slide{number}.xml.rels")
}

pub fn content_types<W: Write + ?Sized>(output: &mut W, slides: usize) -> Res {
    write!(
        output,
        r#"{XML_HEADER}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="{PRESENTATIONML}.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="{PRESENTATIONML}.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="{PRESENTATIONML}.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#
    )?;
    for number in 1..=slides {
        write!(
            output,
            r#"<Override PartName="/{}" ContentType="{PRESENTATIONML}.slide+xml"/>"#,
            slide_part(number)
        )?;
    }
    output.write_str("</Types>")?;
    Ok(())
}

fn relationship<W: Write + ?Sized>(output: &mut W, id: usize, kind: &str, target: &str) -> Res {
    write!(
        output,
        r#"<Relationship Id="rId{id}" Type="{kind}" Target="{target}"/>"#
    )?;
    Ok(())
}

pub fn package_relationships<W: Write + ?Sized>(output: &mut W) -> Res {
    write!(output, r#"{XML_HEADER}<Relationships xmlns="{RELATIONSHIPS}">"#)?;
    relationship(
        output,
        1,
        &format!("{OFFICE_RELATIONSHIP}/officeDocument"),
        "ppt/presentation.xml",
    )?;
    relationship(
        output,
        2,
        &format!("{RELATIONSHIPS}/metadata/core-properties"),
        "docProps/core.xml",
    )?;
    relationship(
        output,
        3,
        &format!("{OFFICE_RELATIONSHIP}/extended-properties"),
        "docProps/app.xml",
    )?;
    output.write_str("</Relationships>")?;
    Ok(())
}

pub fn core_properties<W: Write + ?Sized>(output: &mut W, title: &str) -> Res {
    write!(
        output,
        r#"{XML_HEADER}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dc:creator>{APPLICATION}</dc:creator></cp:coreProperties>"#,
        Escaped(title)
    )?;
    Ok(())
}

pub fn app_properties<W: Write + ?Sized>(output: &mut W, slides: usize) -> Res {
    write!(
        output,
        r#"{XML_HEADER}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>{APPLICATION}</Application><Slides>{slides}</Slides></Properties>"#
    )?;
    Ok(())
}

pub fn presentation<W: Write + ?Sized>(output: &mut W, slides: usize) -> Res {
    write!(
        output,
        r#"{XML_HEADER}<p:presentation {NAMESPACES} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>"#
    )?;
    for i in 0..slides {
        write!(
            output,
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            FIRST_SLIDE_ID + i,
            RESERVED_PRESENTATION_RELATIONSHIPS + i + 1
        )?;
    }
    write!(
        output,
        r#"</p:sldIdLst><p:sldSz cx="{SLIDE_WIDTH}" cy="{SLIDE_HEIGHT}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
    )?;
    Ok(())
}

pub fn presentation_relationships<W: Write + ?Sized>(output: &mut W, slides: usize) -> Res {
    write!(output, r#"{XML_HEADER}<Relationships xmlns="{RELATIONSHIPS}">"#)?;
    relationship(
        output,
        1,
        &format!("{OFFICE_RELATIONSHIP}/slideMaster"),
        "slideMasters/slideMaster1.xml",
    )?;
    relationship(
        output,
        2,
        &format!("{OFFICE_RELATIONSHIP}/theme"),
        "theme/theme1.xml",
    )?;
    let kind = format!("{OFFICE_RELATIONSHIP}/slide");
    for number in 1..=slides {
        relationship(
            output,
            RESERVED_PRESENTATION_RELATIONSHIPS + number,
            &kind,
            &format!("slides/slide{number}.xml"),
        )?;
    }
    output.write_str("</Relationships>")?;
    Ok(())
}

pub fn slide_master<W: Write + ?Sized>(output: &mut W, palette: Palette) -> Res {
    write!(
        output,
        r#"{XML_HEADER}<p:sldMaster {NAMESPACES}><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree>{SHAPE_TREE_HEAD}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#,
        palette.background
    )?;
    Ok(())
}

pub fn slide_master_relationships<W: Write + ?Sized>(output: &mut W) -> Res {
    write!(output, r#"{XML_HEADER}<Relationships xmlns="{RELATIONSHIPS}">"#)?;
    relationship(
        output,
        1,
        &format!("{OFFICE_RELATIONSHIP}/slideLayout"),
        "../slideLayouts/slideLayout1.xml",
    )?;
    relationship(
        output,
        2,
        &format!("{OFFICE_RELATIONSHIP}/theme"),
        "../theme/theme1.xml",
    )?;
    output.write_str("</Relationships>")?;
    Ok(())
}

pub fn slide_layout<W: Write + ?Sized>(output: &mut W) -> Res {
    write!(
        output,
        r#"{XML_HEADER}<p:sldLayout {NAMESPACES} type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{SHAPE_TREE_HEAD}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )?;
    Ok(())
}

pub fn slide_layout_relationships<W: Write + ?Sized>(output: &mut W) -> Res {
    write!(output, r#"{XML_HEADER}<Relationships xmlns="{RELATIONSHIPS}">"#)?;
    relationship(
        output,
        1,
        &format!("{OFFICE_RELATIONSHIP}/slideMaster"),
        "../slideMasters/slideMaster1.xml",
    )?;
    output.write_str("</Relationships>")?;
    Ok(())
}

pub fn slide_relationships<W: Write + ?Sized>(output: &mut W) -> Res {
    write!(output, r#"{XML_HEADER}<Relationships xmlns="{RELATIONSHIPS}">"#)?;
    relationship(
        output,
        1,
        &format!("{OFFICE_RELATIONSHIP}/slideLayout"),
        "../slideLayouts/slideLayout1.xml",
    )?;
    output.write_str("</Relationships>")?;
    Ok(())
}

/// Accent colors shared by every theme
const ACCENTS: [&str; 6] = ["4472C4", "ED7D31", "A5A5A5", "FFC000", "5B9BD5", "70AD47"];

pub fn theme<W: Write + ?Sized>(output: &mut W, theme: Theme, title_font: &str, body_font: &str) -> Res {
    let name = theme.name();
    let Palette {
        background,
        text,
        muted,
    } = theme.palette();
    write!(
        output,
        r#"{XML_HEADER}<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="{name}"><a:themeElements><a:clrScheme name="{name}"><a:dk1><a:srgbClr val="{text}"/></a:dk1><a:lt1><a:srgbClr val="{background}"/></a:lt1><a:dk2><a:srgbClr val="{muted}"/></a:dk2><a:lt2><a:srgbClr val="{background}"/></a:lt2>"#
    )?;
    for (i, accent) in ACCENTS.iter().enumerate() {
        write!(
            output,
            r#"<a:accent{n}><a:srgbClr val="{accent}"/></a:accent{n}>"#,
            n = i + 1
        )?;
    }
    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = format!(r#"<a:ln w="6350">{solid}</a:ln>"#);
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";
    write!(
        output,
        r#"<a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="{name}"><a:majorFont><a:latin typeface="{title}"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="{body}"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="{name}"><a:fillStyleLst>{solid}{solid}{solid}</a:fillStyleLst><a:lnStyleLst>{line}{line}{line}</a:lnStyleLst><a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst><a:bgFillStyleLst>{solid}{solid}{solid}</a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#,
        title = Escaped(title_font),
        body = Escaped(body_font),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_list_every_slide() {
        let mut output = String::new();

        content_types(&mut output, 3).expect("Should write");

        assert!(output.starts_with(XML_HEADER));
        for number in 1..=3 {
            assert!(output.contains(&format!(
                r#"<Override PartName="/ppt/slides/slide{number}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
            )));
        }
        assert!(!output.contains("slide4.xml"));
        assert!(output.ends_with("</Types>"));
    }

    #[test]
    fn presentation_ids_match_relationships() {
        let mut presentation_xml = String::new();
        let mut relationships_xml = String::new();

        presentation(&mut presentation_xml, 2).expect("Should write");
        presentation_relationships(&mut relationships_xml, 2).expect("Should write");

        assert!(presentation_xml.contains(r#"<p:sldId id="256" r:id="rId3"/><p:sldId id="257" r:id="rId4"/>"#));
        assert!(presentation_xml.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));
        assert!(relationships_xml.contains(r#"Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml""#));
        assert!(relationships_xml.contains(r#"Id="rId4""#));
        assert!(!relationships_xml.contains(r#"Id="rId5""#));
    }

    #[test]
    fn theme_carries_palette_and_fonts() {
        let mut output = String::new();

        theme(&mut output, Theme::DefaultDark, "Verdana", "Calibri").expect("Should write");

        assert!(output.contains(r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="defaultDark">"#));
        assert!(output.contains(r#"<a:dk1><a:srgbClr val="F2F2F2"/></a:dk1><a:lt1><a:srgbClr val="1E1E1E"/></a:lt1>"#));
        assert!(output.contains(r#"<a:accent6><a:srgbClr val="70AD47"/></a:accent6>"#));
        assert!(output.contains(r#"<a:majorFont><a:latin typeface="Verdana"/>"#));
        assert!(output.contains(r#"<a:minorFont><a:latin typeface="Calibri"/>"#));
    }

    #[test]
    fn core_properties_escape_title() {
        let mut output = String::new();

        core_properties(&mut output, "말씀 & 찬양").expect("Should write");

        assert!(output.contains("<dc:title>말씀 &amp; 찬양</dc:title>"));
    }
}
