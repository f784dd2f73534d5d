use std::io::{Cursor, Write};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;
use crate::errors::ReportError;
use super::assets::LogoAsset;
use super::document::*;

const EMU_PER_INCH: f64 = 914_400.0;
const SLIDE_CX: i64 = 12_192_000;
const SLIDE_CY: i64 = 6_858_000;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const TEXT_DARK: &str = "1F2937";
const TEXT_SUBTITLE: &str = "374151";
const TEXT_MUTED: &str = "6B7280";
const TEXT_LABEL: &str = "4B5563";
const TILE_FILL: &str = "F9FAFB";

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Escape text for XML element content and attribute values.
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters other than tab/newline are not allowed in XML 1.0
            c if (c as u32) < 0x20 && c != '\t' && c != '\n' && c != '\r' => {}
            c => out.push(c),
        }
    }
    out
}

#[derive(Clone, Copy)]
struct Rect {
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
}

impl Rect {
    fn inches(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x: emu(x), y: emu(y), cx: emu(w), cy: emu(h) }
    }

    fn xfrm(&self) -> String {
        format!(
            r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            self.x, self.y, self.cx, self.cy
        )
    }
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
}

/// One paragraph of a text body.
struct Para<'a> {
    text: &'a str,
    size_pt: u32,
    bold: bool,
    color: &'a str,
    align: Align,
}

impl<'a> Para<'a> {
    fn new(text: &'a str, size_pt: u32, color: &'a str) -> Self {
        Self { text, size_pt, bold: false, color, align: Align::Left }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    fn xml(&self) -> String {
        let sz = self.size_pt * 100;
        let ppr = match self.align {
            Align::Left => String::new(),
            Align::Center => r#"<a:pPr algn="ctr"/>"#.to_string(),
        };
        if self.text.is_empty() {
            return format!(r#"<a:p>{}<a:endParaRPr lang="en-US" sz="{}" dirty="0"/></a:p>"#, ppr, sz);
        }
        format!(
            r#"<a:p>{ppr}<a:r><a:rPr lang="en-US" sz="{sz}" b="{b}" dirty="0"><a:solidFill><a:srgbClr val="{color}"/></a:solidFill></a:rPr><a:t>{text}</a:t></a:r></a:p>"#,
            ppr = ppr,
            sz = sz,
            b = if self.bold { 1 } else { 0 },
            color = self.color,
            text = xml_escape(self.text),
        )
    }
}

/// Accumulates the shapes of one slide.
struct SlideXml {
    shapes: Vec<String>,
    next_id: u32,
    has_picture: bool,
}

impl SlideXml {
    fn new() -> Self {
        Self { shapes: Vec::new(), next_id: 2, has_picture: false }
    }

    fn id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn text_box(&mut self, rect: Rect, paras: &[Para], anchor_center: bool) {
        let id = self.id();
        let body: String = paras.iter().map(Para::xml).collect();
        let anchor = if anchor_center { r#" anchor="ctr""# } else { "" };
        self.shapes.push(format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="TextBox {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square" rtlCol="0"{anchor}><a:normAutofit/></a:bodyPr><a:lstStyle/>{body}</p:txBody></p:sp>"#,
            id = id,
            xfrm = rect.xfrm(),
            anchor = anchor,
            body = body,
        ));
    }

    fn tile(&mut self, rect: Rect, border: &str, paras: &[Para]) {
        let id = self.id();
        let body: String = paras.iter().map(Para::xml).collect();
        self.shapes.push(format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Tile {id}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>{xfrm}<a:prstGeom prst="roundRect"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="{fill}"/></a:solidFill><a:ln w="38100"><a:solidFill><a:srgbClr val="{border}"/></a:solidFill></a:ln></p:spPr><p:txBody><a:bodyPr wrap="square" rtlCol="0" anchor="ctr"/><a:lstStyle/>{body}</p:txBody></p:sp>"#,
            id = id,
            xfrm = rect.xfrm(),
            fill = TILE_FILL,
            border = border,
            body = body,
        ));
    }

    /// Picture referencing relationship rId2 of the slide.
    fn picture(&mut self, rect: Rect) {
        let id = self.id();
        self.has_picture = true;
        self.shapes.push(format!(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Logo"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
            id = id,
            xfrm = rect.xfrm(),
        ));
    }

    fn finish(self) -> String {
        format!(
            r#"{decl}<p:sld xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}"><p:cSld><p:spTree>{group}{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
            decl = XML_DECL,
            a = NS_A,
            r = NS_R,
            p = NS_P,
            group = EMPTY_GROUP,
            shapes = self.shapes.concat(),
        )
    }
}

const EMPTY_GROUP: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

fn slide_xml(slide: &Slide, logo: Option<&LogoAsset>) -> (String, bool) {
    let mut xml = SlideXml::new();
    let accent = slide.accent.hex();
    match &slide.body {
        SlideBody::Cover { subtitle, date_line } => {
            if let Some(logo) = logo {
                let height = 1.5;
                xml.picture(Rect::inches(1.0, 0.5, height * logo.aspect_ratio(), height));
            }
            xml.text_box(
                Rect::inches(1.0, 2.0, 11.33, 1.5),
                &[Para::new(&slide.title, 48, accent).bold().centered()],
                false,
            );
            xml.text_box(
                Rect::inches(1.0, 3.5, 11.33, 1.0),
                &[Para::new(subtitle, 32, TEXT_SUBTITLE).centered()],
                false,
            );
            xml.text_box(
                Rect::inches(1.0, 5.0, 11.33, 0.5),
                &[Para::new(date_line, 18, TEXT_MUTED).centered()],
                false,
            );
        }
        SlideBody::Kpis(cards) => {
            xml.text_box(
                Rect::inches(1.0, 0.5, 11.33, 1.0),
                &[Para::new(&slide.title, 36, accent).bold().centered()],
                false,
            );
            for (i, card) in cards.iter().enumerate() {
                let x = 1.0 + i as f64 * 2.8;
                let value = card.value.to_string();
                let color = card.accent.hex();
                xml.tile(
                    Rect::inches(x, 2.5, 2.5, 2.0),
                    color,
                    &[
                        Para::new(card.label, 14, TEXT_LABEL).bold().centered(),
                        Para::new(&value, 32, color).bold().centered(),
                        Para::new(card.caption, 10, TEXT_MUTED).centered(),
                    ],
                );
            }
        }
        SlideBody::Text { text, font_pt } => {
            xml.text_box(
                Rect::inches(0.6, 0.3, 12.1, 1.0),
                &[Para::new(&slide.title, 32, accent).bold()],
                true,
            );
            let paras: Vec<Para> = text
                .trim_end()
                .split('\n')
                .map(|line| Para::new(line, *font_pt, TEXT_DARK))
                .collect();
            xml.text_box(Rect::inches(0.6, 1.4, 12.1, 5.8), &paras, false);
        }
    }
    let has_picture = xml.has_picture;
    (xml.finish(), has_picture)
}

fn content_types(slide_count: usize, logo: Option<&LogoAsset>) -> String {
    let mut xml = format!(
        r#"{}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>"#,
        XML_DECL
    );
    if let Some(logo) = logo {
        xml.push_str(&format!(
            r#"<Default Extension="{}" ContentType="{}"/>"#,
            logo.extension, logo.mime
        ));
    }
    xml.push_str(r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
    for n in 1..=slide_count {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
            n
        ));
    }
    xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/></Types>"#);
    xml
}

/// One package relationship. `kind` is either a full type URI or a short
/// office-document relationship name such as `slide`.
struct Rel {
    id: String,
    kind: String,
    target: String,
}

fn rel(n: usize, kind: &str, target: impl Into<String>) -> Rel {
    let kind = if kind.starts_with("http") {
        kind.to_string()
    } else {
        format!("{}/{}", REL_BASE, kind)
    };
    Rel { id: format!("rId{}", n), kind, target: target.into() }
}

fn relationships(rels: &[Rel]) -> String {
    let body: String = rels
        .iter()
        .map(|r| format!(r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#, r.id, r.kind, r.target))
        .collect();
    format!(r#"{}<Relationships xmlns="{}">{}</Relationships>"#, XML_DECL, NS_PKG_REL, body)
}

fn root_rels() -> String {
    relationships(&[
        rel(1, "officeDocument", "ppt/presentation.xml"),
        rel(2, "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties", "docProps/core.xml"),
        rel(3, "extended-properties", "docProps/app.xml"),
    ])
}

fn presentation(slide_count: usize) -> String {
    let ids: String = (0..slide_count)
        .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, 3 + i))
        .collect();
    format!(
        r#"{decl}<p:presentation xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}" saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{ids}</p:sldIdLst><p:sldSz cx="{cx}" cy="{cy}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        decl = XML_DECL,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        ids = ids,
        cx = SLIDE_CX,
        cy = SLIDE_CY,
    )
}

fn presentation_rels(slide_count: usize) -> String {
    let mut rels = vec![
        rel(1, "slideMaster", "slideMasters/slideMaster1.xml"),
        rel(2, "theme", "theme/theme1.xml"),
    ];
    for n in 1..=slide_count {
        rels.push(rel(n + 2, "slide", format!("slides/slide{}.xml", n)));
    }
    relationships(&rels)
}

fn slide_master() -> String {
    format!(
        r#"{decl}<p:sldMaster xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{group}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle/><p:bodyStyle/><p:otherStyle/></p:txStyles></p:sldMaster>"#,
        decl = XML_DECL,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        group = EMPTY_GROUP,
    )
}

fn slide_layout() -> String {
    format!(
        r#"{decl}<p:sldLayout xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{group}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
        decl = XML_DECL,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        group = EMPTY_GROUP,
    )
}

fn theme() -> String {
    let solid = |v: &str| format!(r#"<a:solidFill><a:schemeClr val="{}"/></a:solidFill>"#, v);
    let line = |w: u32| format!(r#"<a:ln w="{}"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#, w);
    let effect = r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#;
    format!(
        r#"{decl}<a:theme xmlns:a="{a}" name="Risk Audit"><a:themeElements><a:clrScheme name="Risk Audit"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="{dark}"/></a:dk2><a:lt2><a:srgbClr val="F3F4F6"/></a:lt2><a:accent1><a:srgbClr val="1E40AF"/></a:accent1><a:accent2><a:srgbClr val="DC2626"/></a:accent2><a:accent3><a:srgbClr val="EA580C"/></a:accent3><a:accent4><a:srgbClr val="059669"/></a:accent4><a:accent5><a:srgbClr val="6B7280"/></a:accent5><a:accent6><a:srgbClr val="374151"/></a:accent6><a:hlink><a:srgbClr val="1E40AF"/></a:hlink><a:folHlink><a:srgbClr val="6B21A8"/></a:folHlink></a:clrScheme><a:fontScheme name="Risk Audit"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Risk Audit"><a:fillStyleLst>{f}{f}{f}</a:fillStyleLst><a:lnStyleLst>{l1}{l2}{l3}</a:lnStyleLst><a:effectStyleLst>{e}{e}{e}</a:effectStyleLst><a:bgFillStyleLst>{f}{f}{f}</a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#,
        decl = XML_DECL,
        a = NS_A,
        dark = TEXT_DARK,
        f = solid("phClr"),
        l1 = line(9525),
        l2 = line(25400),
        l3 = line(38100),
        e = effect,
    )
}

fn core_props(doc: &DeckDocument) -> String {
    format!(
        r#"{decl}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{title}</dc:title><dc:creator>{creator}</dc:creator><dcterms:created xsi:type="dcterms:W3CDTF">{ts}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{ts}</dcterms:modified></cp:coreProperties>"#,
        decl = XML_DECL,
        title = xml_escape(&format!("{} Audit Report {}", doc.company, doc.audit_date)),
        creator = xml_escape(&doc.company),
        ts = doc.generated_at.format("%Y-%m-%dT%H:%M:%SZ"),
    )
}

fn app_props(slide_count: usize) -> String {
    format!(
        r#"{decl}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>riskdeck</Application><PresentationFormat>Widescreen</PresentationFormat><Slides>{n}</Slides><AppVersion>{v}</AppVersion></Properties>"#,
        decl = XML_DECL,
        n = slide_count,
        v = env!("CARGO_PKG_VERSION"),
    )
}

fn put(zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, bytes: &[u8]) -> Result<(), ReportError> {
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(name, options)?;
    zip.write_all(bytes)?;
    Ok(())
}

/// Serialize the deck as a `.pptx` package.
pub fn render_deck(doc: &DeckDocument, logo: Option<&LogoAsset>) -> Result<Vec<u8>, ReportError> {
    if doc.slides.is_empty() {
        return Err(ReportError::Rendering("Deck has no slides".into()));
    }
    let slide_count = doc.slides.len();

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    put(&mut zip, "[Content_Types].xml", content_types(slide_count, logo).as_bytes())?;
    put(&mut zip, "_rels/.rels", root_rels().as_bytes())?;
    put(&mut zip, "docProps/core.xml", core_props(doc).as_bytes())?;
    put(&mut zip, "docProps/app.xml", app_props(slide_count).as_bytes())?;
    put(&mut zip, "ppt/presentation.xml", presentation(slide_count).as_bytes())?;
    put(&mut zip, "ppt/_rels/presentation.xml.rels", presentation_rels(slide_count).as_bytes())?;
    put(&mut zip, "ppt/slideMasters/slideMaster1.xml", slide_master().as_bytes())?;
    let master_rels = relationships(&[
        rel(1, "slideLayout", "../slideLayouts/slideLayout1.xml"),
        rel(2, "theme", "../theme/theme1.xml"),
    ]);
    put(&mut zip, "ppt/slideMasters/_rels/slideMaster1.xml.rels", master_rels.as_bytes())?;
    put(&mut zip, "ppt/slideLayouts/slideLayout1.xml", slide_layout().as_bytes())?;
    let layout_rels = relationships(&[rel(1, "slideMaster", "../slideMasters/slideMaster1.xml")]);
    put(&mut zip, "ppt/slideLayouts/_rels/slideLayout1.xml.rels", layout_rels.as_bytes())?;
    put(&mut zip, "ppt/theme/theme1.xml", theme().as_bytes())?;

    for (idx, slide) in doc.slides.iter().enumerate() {
        let n = idx + 1;
        let (xml, has_picture) = slide_xml(slide, logo);
        put(&mut zip, &format!("ppt/slides/slide{}.xml", n), xml.as_bytes())?;

        let mut rels = vec![rel(1, "slideLayout", "../slideLayouts/slideLayout1.xml")];
        if let (true, Some(logo)) = (has_picture, logo) {
            rels.push(rel(2, "image", format!("../media/logo1.{}", logo.extension)));
        }
        put(&mut zip, &format!("ppt/slides/_rels/slide{}.xml.rels", n), relationships(&rels).as_bytes())?;
    }

    if let Some(logo) = logo {
        put(&mut zip, &format!("ppt/media/logo1.{}", logo.extension), &logo.bytes)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
