//! GEXF 1.2 Export
//!
//! Writes the annotated graph for Gephi. Scalar attributes only:
//! nodes carry `in_entropy_sum`, weighted `in_degree` / `out_degree` and a
//! viridis `viz:color`; edges carry `weight` and `entropy`. The mapping
//! valued `next_counts` has no GEXF representation and is dropped.

use std::collections::HashMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::info;

use super::colormap::ColorScale;
use crate::error::{AnalysisError, Result};
use crate::graph::{AnnotatedGraph, StateLabel};

const GEXF_NS: &str = "http://www.gexf.net/1.2draft";
const VIZ_NS: &str = "http://www.gexf.net/1.2draft/viz";

const NODE_ATTRIBUTES: [(&str, &str, &str); 3] = [
    ("0", "in_entropy_sum", "double"),
    ("1", "in_degree", "long"),
    ("2", "out_degree", "long"),
];
const EDGE_ATTRIBUTES: [(&str, &str, &str); 1] = [("3", "entropy", "double")];

/// Write `graph` as GEXF to a file.
pub fn export_gexf<L>(graph: &AnnotatedGraph<L>, path: impl AsRef<Path>) -> Result<()>
where
    L: StateLabel + Display,
{
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| AnalysisError::io(path, e))?;
    let mut out = BufWriter::new(file);
    write_gexf(graph, &mut out)?;
    out.flush().map_err(|e| AnalysisError::io(path, e))?;
    info!(path = %path.display(), "graph exported (gexf)");
    Ok(())
}

/// Write `graph` as GEXF to any writer.
pub fn write_gexf<L, W>(graph: &AnnotatedGraph<L>, out: W) -> Result<()>
where
    L: StateLabel + Display,
    W: Write,
{
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    let scale = ColorScale::from_values(graph.nodes().map(|n| n.data.in_entropy_sum));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("gexf").with_attributes([
        ("xmlns", GEXF_NS),
        ("xmlns:viz", VIZ_NS),
        ("version", "1.2"),
    ])))?;

    writer.write_event(Event::Start(BytesStart::new("meta")))?;
    writer.write_event(Event::Start(BytesStart::new("creator")))?;
    writer.write_event(Event::Text(BytesText::new(env!("CARGO_PKG_NAME"))))?;
    writer.write_event(Event::End(BytesEnd::new("creator")))?;
    writer.write_event(Event::End(BytesEnd::new("meta")))?;

    writer.write_event(Event::Start(
        BytesStart::new("graph").with_attributes([("defaultedgetype", "directed"), ("mode", "static")]),
    ))?;
    write_attribute_block(&mut writer, "node", &NODE_ATTRIBUTES)?;
    write_attribute_block(&mut writer, "edge", &EDGE_ATTRIBUTES)?;

    writer.write_event(Event::Start(BytesStart::new("nodes")))?;
    for (id, node) in graph.nodes().enumerate() {
        let id = id.to_string();
        let label = node.label.to_string();
        writer.write_event(Event::Start(
            BytesStart::new("node").with_attributes([("id", id.as_str()), ("label", label.as_str())]),
        ))?;

        let values = [
            node.data.in_entropy_sum.to_string(),
            graph.in_weight(&node.label).to_string(),
            graph.out_weight(&node.label).to_string(),
        ];
        write_attvalues(&mut writer, NODE_ATTRIBUTES.iter().map(|a| a.0).zip(values.iter()))?;

        let color = scale.color(node.data.in_entropy_sum);
        let (r, g, b, a) = (
            color.r.to_string(),
            color.g.to_string(),
            color.b.to_string(),
            color.a.to_string(),
        );
        writer.write_event(Event::Empty(BytesStart::new("viz:color").with_attributes([
            ("r", r.as_str()),
            ("g", g.as_str()),
            ("b", b.as_str()),
            ("a", a.as_str()),
        ])))?;
        writer.write_event(Event::End(BytesEnd::new("node")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("nodes")))?;

    // Node ids are positions in node order
    let ids: HashMap<&L, usize> = graph.nodes().enumerate().map(|(i, n)| (&n.label, i)).collect();
    let position = |label: &L| {
        ids.get(label).copied().ok_or_else(|| {
            AnalysisError::InvalidSnapshot(format!("edge references unknown node {:?}", label))
        })
    };

    writer.write_event(Event::Start(BytesStart::new("edges")))?;
    for (id, edge) in graph.edges().enumerate() {
        let id = id.to_string();
        let source = position(edge.source)?.to_string();
        let target = position(edge.target)?.to_string();
        let weight = edge.data.transition.weight.to_string();
        writer.write_event(Event::Start(BytesStart::new("edge").with_attributes([
            ("id", id.as_str()),
            ("source", source.as_str()),
            ("target", target.as_str()),
            ("weight", weight.as_str()),
        ])))?;
        let entropy = [edge.data.entropy.to_string()];
        write_attvalues(&mut writer, EDGE_ATTRIBUTES.iter().map(|a| a.0).zip(entropy.iter()))?;
        writer.write_event(Event::End(BytesEnd::new("edge")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("edges")))?;

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("gexf")))?;
    Ok(())
}

fn write_attribute_block<W: Write>(
    writer: &mut Writer<W>,
    class: &str,
    attributes: &[(&str, &str, &str)],
) -> Result<()> {
    writer.write_event(Event::Start(
        BytesStart::new("attributes").with_attributes([("class", class), ("mode", "static")]),
    ))?;
    for (id, title, kind) in attributes {
        writer.write_event(Event::Empty(
            BytesStart::new("attribute").with_attributes([("id", *id), ("title", *title), ("type", *kind)]),
        ))?;
    }
    writer.write_event(Event::End(BytesEnd::new("attributes")))?;
    Ok(())
}

fn write_attvalues<'a, W: Write>(
    writer: &mut Writer<W>,
    values: impl Iterator<Item = (&'a str, &'a String)>,
) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("attvalues")))?;
    for (key, value) in values {
        writer.write_event(Event::Empty(
            BytesStart::new("attvalue").with_attributes([("for", key), ("value", value.as_str())]),
        ))?;
    }
    writer.write_event(Event::End(BytesEnd::new("attvalues")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{run_pipeline, PipelineConfig};

    fn render(sequence: &str) -> String {
        let input: Vec<String> = sequence.split_whitespace().map(String::from).collect();
        let out = run_pipeline(&input, &PipelineConfig::default()).unwrap();
        let mut buffer = Vec::new();
        write_gexf(&out.graph, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_gexf_structure() {
        let xml = render("A B C A B D");
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"defaultedgetype="directed""#));
        assert_eq!(xml.matches("<node ").count(), 4);
        assert_eq!(xml.matches("<edge ").count(), 4);
        assert!(xml.contains(r#"<edge id="0" source="0" target="1" weight="2">"#));
        assert!(xml.contains("viz:color"));
        assert!(!xml.contains("next_counts"));
    }

    #[test]
    fn test_edge_endpoints_use_node_ids() {
        // Nodes A B C D get ids 0 1 2 3 in first-seen order
        let xml = render("A B C A B D");
        for (id, source, target) in [(0, 0, 1), (1, 1, 2), (2, 2, 0), (3, 1, 3)] {
            let tag = format!(r#"<edge id="{}" source="{}" target="{}""#, id, source, target);
            assert!(xml.contains(&tag), "missing {}", tag);
        }
    }

    #[test]
    fn test_labels_are_escaped() {
        let xml = render("a<b c&d a<b");
        assert!(xml.contains("a&lt;b"));
        assert!(xml.contains("c&amp;d"));
    }

    #[test]
    fn test_empty_graph() {
        let xml = render("");
        assert!(xml.contains("<nodes>"));
        assert_eq!(xml.matches("<node ").count(), 0);
    }
}
