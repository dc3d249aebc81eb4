//! Office Math (OMML) emission for parsed expressions.

use super::xml::XmlSink;
use crate::error::Result;
use crate::math::{MathNode, MATH_FONT};

/// Write a sequence of nodes as the content of an `m:oMath` element.
fn write_nodes(sink: &mut XmlSink, nodes: &[MathNode]) -> Result<()> {
    for node in nodes {
        write_node(sink, node)?;
    }
    Ok(())
}

/// Write a whole `m:oMath` element.
pub(crate) fn write_omml(sink: &mut XmlSink, nodes: &[MathNode]) -> Result<()> {
    sink.start("m:oMath", &[])?;
    write_nodes(sink, nodes)?;
    sink.end("m:oMath")
}

fn write_node(sink: &mut XmlSink, node: &MathNode) -> Result<()> {
    match node {
        MathNode::Text { text } => math_run(sink, text, false),
        MathNode::Literal { text } => math_run(sink, text, true),
        MathNode::Fraction { num, den } => {
            sink.start("m:f", &[])?;
            group(sink, "m:num", num)?;
            group(sink, "m:den", den)?;
            sink.end("m:f")
        }
        MathNode::Sup { base, sup } => {
            sink.start("m:sSup", &[])?;
            group(sink, "m:e", base)?;
            group(sink, "m:sup", sup)?;
            sink.end("m:sSup")
        }
        MathNode::Sub { base, sub } => {
            sink.start("m:sSub", &[])?;
            group(sink, "m:e", base)?;
            group(sink, "m:sub", sub)?;
            sink.end("m:sSub")
        }
        MathNode::SubSup { base, sub, sup } => {
            sink.start("m:sSubSup", &[])?;
            group(sink, "m:e", base)?;
            group(sink, "m:sub", sub)?;
            group(sink, "m:sup", sup)?;
            sink.end("m:sSubSup")
        }
    }
}

fn group(sink: &mut XmlSink, name: &str, nodes: &[MathNode]) -> Result<()> {
    sink.start(name, &[])?;
    write_nodes(sink, nodes)?;
    sink.end(name)
}

/// A math run. Literal runs are marked normal text so Word does not
/// italicize the verbatim source.
fn math_run(sink: &mut XmlSink, text: &str, literal: bool) -> Result<()> {
    sink.start("m:r", &[])?;
    if literal {
        sink.start("m:rPr", &[])?;
        sink.empty("m:nor", &[])?;
        sink.end("m:rPr")?;
    }
    sink.start("w:rPr", &[])?;
    sink.empty(
        "w:rFonts",
        &[("w:ascii", MATH_FONT), ("w:hAnsi", MATH_FONT)],
    )?;
    sink.end("w:rPr")?;
    sink.leaf("m:t", &[("xml:space", "preserve")], text)?;
    sink.end("m:r")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::parse_expression;

    fn render(source: &str) -> String {
        let mut sink = XmlSink::new().unwrap();
        write_omml(&mut sink, &parse_expression(source)).unwrap();
        String::from_utf8(sink.into_bytes()).unwrap()
    }

    #[test]
    fn test_fraction_markup() {
        let xml = render(r"$\frac{a}{b}$");
        assert!(xml.contains("<m:oMath><m:f><m:num><m:r>"));
        assert!(xml.contains("<m:t xml:space=\"preserve\">a</m:t>"));
        assert!(xml.contains("</m:num><m:den>"));
        assert!(xml.ends_with("</m:den></m:f></m:oMath>"));
    }

    #[test]
    fn test_scripts_markup() {
        let xml = render("$x^{2}$");
        assert!(xml.contains("<m:sSup><m:e>"));
        assert!(xml.contains("<m:sup>"));

        let xml = render("$x_{i}^{2}$");
        assert!(xml.contains("<m:sSubSup><m:e>"));
        assert!(xml.contains("</m:sub><m:sup>"));
    }

    #[test]
    fn test_literal_is_normal_text() {
        let xml = render(r"$\unknowncmd{x}$");
        assert!(xml.contains("<m:rPr><m:nor/></m:rPr>"));
        assert!(xml.contains("Cambria Math"));
    }
}
