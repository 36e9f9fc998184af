//! Graphviz export.
//!
//! The semantic model is translated into a `dot-structures` graph and laid
//! out and rendered by the `dot` executable. Graphviz treats every subgraph
//! whose name starts with `cluster_` as a framed cluster.

use dot_structures::{
    Attribute, Edge, EdgeTy, Graph, GraphAttributes, Id, Node, NodeId as DotNodeId, Stmt,
    Subgraph, Vertex,
};
use graphviz_rust::{
    cmd::{CommandArg, Format},
    printer::PrinterContext,
};
use log::info;

use caffeine_diagrams_core::semantic::{ClusterId, Diagram, Icon};

use crate::{
    config::{OutputFormat, StyleConfig},
    export,
};

/// Renders `diagram` with Graphviz into `format`.
///
/// # Errors
///
/// Returns [`export::Error::Graphviz`] when `dot` is missing or fails.
pub fn render(
    diagram: &Diagram,
    style: &StyleConfig,
    format: OutputFormat,
) -> Result<Vec<u8>, export::Error> {
    info!(title = diagram.title(), format:% = format; "Rendering with Graphviz");
    let graph = to_graph(diagram, style);
    let format = match format {
        OutputFormat::Png => Format::Png,
        OutputFormat::Svg => Format::Svg,
    };
    graphviz_rust::exec(
        graph,
        &mut PrinterContext::default(),
        vec![CommandArg::Format(format)],
    )
    .map_err(|err| export::Error::Graphviz(err.to_string()))
}

/// Builds the Graphviz graph for `diagram`.
pub fn to_graph(diagram: &Diagram, style: &StyleConfig) -> Graph {
    let mut stmts = vec![
        Stmt::GAttribute(GraphAttributes::Graph(vec![
            attr("rankdir", plain(diagram.direction().as_str())),
            attr("label", quoted(diagram.title())),
            attr("labelloc", plain("b")),
            attr("fontname", quoted(style.font_family())),
            attr("fontsize", plain("20")),
            attr("bgcolor", quoted(style.background_color_str().unwrap_or("transparent"))),
        ])),
        Stmt::GAttribute(GraphAttributes::Node(vec![
            attr("fontname", quoted(style.font_family())),
            attr("fontsize", plain("13")),
        ])),
        Stmt::GAttribute(GraphAttributes::Edge(vec![
            attr("color", quoted(style.edge_color_str())),
            attr("fontcolor", quoted(style.edge_color_str())),
            attr("fontsize", plain("12")),
        ])),
    ];

    stmts.extend(scope_statements(diagram, style, None));

    for edge in diagram.edges() {
        let mut attributes = Vec::new();
        if let Some(label) = edge.label() {
            attributes.push(attr("label", quoted(label)));
        }
        stmts.push(Stmt::Edge(Edge {
            ty: EdgeTy::Pair(
                Vertex::N(node_id(edge.source().index())),
                Vertex::N(node_id(edge.target().index())),
            ),
            attributes,
        }));
    }

    Graph::DiGraph {
        id: quoted(diagram.filename()),
        strict: false,
        stmts,
    }
}

/// Nodes and nested cluster subgraphs declared directly in `container`.
fn scope_statements(
    diagram: &Diagram,
    style: &StyleConfig,
    container: Option<ClusterId>,
) -> Vec<Stmt> {
    let mut stmts: Vec<Stmt> = diagram
        .nodes()
        .iter()
        .filter(|node| node.cluster() == container)
        .map(|node| {
            let mut attributes = icon_attributes(node.icon());
            attributes.push(attr("label", quoted(node.label())));
            Stmt::Node(Node {
                id: node_id(node.id().index()),
                attributes,
            })
        })
        .collect();

    for cluster in diagram
        .clusters()
        .iter()
        .filter(|cluster| cluster.parent() == container)
    {
        let mut inner = vec![
            Stmt::Attribute(attr("label", quoted(cluster.title()))),
            Stmt::Attribute(attr("labeljust", plain("l"))),
            Stmt::Attribute(attr("style", quoted("rounded,filled,dashed"))),
            Stmt::Attribute(attr("fillcolor", quoted(style.cluster_fill_str()))),
            Stmt::Attribute(attr("color", quoted(style.edge_color_str()))),
        ];
        inner.extend(scope_statements(diagram, style, Some(cluster.id())));
        stmts.push(Stmt::Subgraph(Subgraph {
            id: plain(&format!("cluster_{}", cluster.id().index())),
            stmts: inner,
        }));
    }

    stmts
}

/// Shape and colors standing in for the icon picture.
fn icon_attributes(icon: Icon) -> Vec<Attribute> {
    let shape = match icon {
        Icon::PostgreSql | Icon::Rds => "cylinder",
        Icon::Docker | Icon::Ecs => "component",
        Icon::Alb | Icon::Elb => "hexagon",
        Icon::Users => "house",
        Icon::Server | Icon::Rack => "box3d",
        Icon::Mlflow | Icon::FastApi | Icon::React | Icon::Slack => "box",
    };
    vec![
        attr("shape", plain(shape)),
        attr("style", quoted("rounded,filled")),
        attr("fillcolor", quoted("white")),
        attr("color", quoted(icon.accent())),
        attr("penwidth", plain("2")),
    ]
}

fn node_id(index: usize) -> DotNodeId {
    DotNodeId(plain(&format!("n{index}")), None)
}

fn attr(key: &str, value: Id) -> Attribute {
    Attribute(plain(key), value)
}

fn plain(value: &str) -> Id {
    Id::Plain(value.to_string())
}

/// Double-quoted Graphviz string; line breaks become centered `\n` breaks.
fn quoted(value: &str) -> Id {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    Id::Escaped(format!("\"{escaped}\""))
}

#[cfg(test)]
mod tests {
    use graphviz_rust::printer::DotPrinter;

    use caffeine_diagrams_core::semantic::Direction;

    use super::*;

    fn sample() -> Diagram {
        Diagram::build("Caffeine Deployment", "caffeine_deployment", Direction::LeftRight, |scope| {
            let github = scope.cluster("Development", |dev| dev.node(Icon::Server, "GitHub"));
            let rds = scope.cluster("AWS Cloud", |aws| {
                aws.cluster("Data", |data| data.node(Icon::Rds, "AWS RDS"))
            });
            scope.connect_labeled(github, rds, "deploy");
        })
    }

    #[test]
    fn test_graph_carries_rankdir_clusters_and_labels() {
        let dot = to_graph(&sample(), &StyleConfig::default()).print(&mut PrinterContext::default());
        assert!(dot.contains("rankdir=LR"));
        assert!(dot.contains("subgraph cluster_0"));
        assert!(dot.contains("subgraph cluster_2"));
        assert!(dot.contains("\"AWS RDS\""));
        assert!(dot.contains("shape=cylinder"));
        assert!(dot.contains("n0 -> n1"));
        assert!(dot.contains("\"deploy\""));
    }

    #[test]
    fn test_quoted_escapes_line_breaks_and_quotes() {
        let Id::Escaped(text) = quoted("User App\n\"RN\"") else {
            panic!("expected an escaped id");
        };
        assert_eq!(text, r#""User App\n\"RN\"""#);
    }
}
