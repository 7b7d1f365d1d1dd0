//! GML topology reader.
//!
//! Reads the subset of GML that graph tools emit for network topologies:
//!
//! ```text
//! graph [
//!   node [ id 0 label "R1" ]
//!   node [ id 1 label "R2" ]
//!   edge [ source 0 target 1 weight 10 bandwidth "100Mbit" delay "2ms" ]
//! ]
//! ```
//!
//! Unknown keys are kept as raw attributes, nested lists (such as a node's
//! `graphics [ ... ]`) are skipped. Edge order in the file is preserved.

use crate::error::TopologyError;
use crate::topology::types::{Topology, TopologyEdge};
use crate::utils::bandwidth::parse_bandwidth;
use crate::utils::duration::parse_delay;
use color_eyre::eyre::{eyre, Result, WrapErr};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub struct GmlNode {
    pub id: u32,
    pub label: Option<String>,
    pub attributes: HashMap<String, String>,
}

impl GmlNode {
    /// Lab entity name: the label, or `n<id>` for unlabelled nodes
    pub fn name(&self) -> String {
        match &self.label {
            Some(label) if !label.trim().is_empty() => label.clone(),
            _ => format!("n{}", self.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GmlEdge {
    pub source: u32,
    pub target: u32,
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GmlGraph {
    pub nodes: Vec<GmlNode>,
    pub edges: Vec<GmlEdge>,
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Key(String),
    Number(String),
    Text(String),
    Open,
    Close,
    End,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
            line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next();
        if ch == Some('\n') {
            self.line += 1;
        }
        ch
    }

    fn take_while(&mut self, first: char, keep: impl Fn(char) -> bool) -> String {
        let mut word = String::from(first);
        while let Some(&ch) = self.chars.peek() {
            if !keep(ch) {
                break;
            }
            word.push(ch);
            self.bump();
        }
        word
    }

    fn next_token(&mut self) -> Result<Token> {
        loop {
            let Some(ch) = self.bump() else {
                return Ok(Token::End);
            };
            match ch {
                c if c.is_whitespace() => continue,
                '#' => {
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                '[' => return Ok(Token::Open),
                ']' => return Ok(Token::Close),
                '"' => return self.text(),
                c if c.is_alphabetic() || c == '_' => {
                    return Ok(Token::Key(
                        self.take_while(c, |c| c.is_alphanumeric() || c == '_'),
                    ));
                }
                c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                    return Ok(Token::Number(self.take_while(c, |c| {
                        c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '+'
                    })));
                }
                c => return Err(eyre!("line {}: unexpected character '{}'", self.line, c)),
            }
        }
    }

    fn text(&mut self) -> Result<Token> {
        let start = self.line;
        let mut text = String::new();
        while let Some(ch) = self.bump() {
            match ch {
                '"' => return Ok(Token::Text(text)),
                '\\' => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(other) => text.push(other),
                    None => break,
                },
                other => text.push(other),
            }
        }
        Err(eyre!("line {}: unterminated string", start))
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    token: Token,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token()?;
        Ok(Parser { lexer, token })
    }

    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.token, next))
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        if self.token != expected {
            return Err(eyre!(
                "line {}: expected {:?}, found {:?}",
                self.lexer.line,
                expected,
                self.token
            ));
        }
        self.advance()?;
        Ok(())
    }

    fn key(&mut self) -> Result<String> {
        match self.advance()? {
            Token::Key(key) => Ok(key),
            other => Err(eyre!(
                "line {}: expected a key, found {:?}",
                self.lexer.line,
                other
            )),
        }
    }

    /// A scalar value, or `None` after skipping a nested list
    fn value(&mut self) -> Result<Option<String>> {
        match self.advance()? {
            Token::Number(v) | Token::Text(v) | Token::Key(v) => Ok(Some(v)),
            Token::Open => {
                self.skip_list()?;
                Ok(None)
            }
            other => Err(eyre!(
                "line {}: expected a value, found {:?}",
                self.lexer.line,
                other
            )),
        }
    }

    /// Skip to the `]` matching an already consumed `[`
    fn skip_list(&mut self) -> Result<()> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance()? {
                Token::Open => depth += 1,
                Token::Close => depth -= 1,
                Token::End => return Err(eyre!("unexpected end of file inside a list")),
                _ => {}
            }
        }
        Ok(())
    }

    /// Key/value pairs up to the closing `]` of the current list
    fn pairs(&mut self) -> Result<HashMap<String, String>> {
        let mut pairs = HashMap::new();
        while self.token != Token::Close {
            let key = self.key()?;
            if let Some(value) = self.value()? {
                pairs.insert(key, value);
            }
        }
        self.expect(Token::Close)?;
        Ok(pairs)
    }

    fn graph(&mut self) -> Result<GmlGraph> {
        // Files may carry top-level keys such as `Creator` before the graph
        while self.token != Token::Key("graph".to_string()) {
            if self.token == Token::End {
                return Err(eyre!("no graph [ ... ] block found"));
            }
            self.key()?;
            self.value()?;
        }
        self.advance()?;
        self.expect(Token::Open)?;

        let mut graph = GmlGraph::default();
        while self.token != Token::Close {
            let key = self.key()?;
            match key.as_str() {
                "node" => {
                    self.expect(Token::Open)?;
                    let mut attributes = self.pairs()?;
                    let id = take_id(&mut attributes, "id", "node")?;
                    graph.nodes.push(GmlNode {
                        id,
                        label: attributes.remove("label"),
                        attributes,
                    });
                }
                "edge" => {
                    self.expect(Token::Open)?;
                    let mut attributes = self.pairs()?;
                    graph.edges.push(GmlEdge {
                        source: take_id(&mut attributes, "source", "edge")?,
                        target: take_id(&mut attributes, "target", "edge")?,
                        attributes,
                    });
                }
                _ => {
                    if let Some(value) = self.value()? {
                        graph.attributes.insert(key, value);
                    }
                }
            }
        }
        self.expect(Token::Close)?;
        Ok(graph)
    }
}

fn take_id(attributes: &mut HashMap<String, String>, key: &str, what: &str) -> Result<u32> {
    let raw = attributes
        .remove(key)
        .ok_or_else(|| eyre!("{} is missing required '{}'", what, key))?;
    raw.parse::<u32>()
        .map_err(|_| eyre!("{} has invalid '{}' value '{}'", what, key, raw))
}

/// Parse GML text
pub fn parse_gml(content: &str) -> Result<GmlGraph> {
    Parser::new(content)?.graph()
}

/// Read and parse a GML file
pub fn parse_gml_file(path: &Path) -> Result<GmlGraph> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read GML file {:?}", path))?;
    let graph = parse_gml(&content).wrap_err_with(|| format!("Invalid GML in {:?}", path))?;
    log::info!(
        "Loaded GML topology from {:?} with {} nodes and {} edges",
        path,
        graph.nodes.len(),
        graph.edges.len()
    );
    Ok(graph)
}

impl GmlGraph {
    /// Convert into a named topology.
    ///
    /// Edge attributes `weight`, `bandwidth` and `delay` (or `latency`) are
    /// interpreted; any other attribute is ignored.
    pub fn to_topology(&self) -> Result<Topology, TopologyError> {
        let mut names: HashMap<u32, String> = HashMap::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut topology = Topology::new();

        for node in &self.nodes {
            let name = node.name();
            if names.contains_key(&node.id) || !seen.insert(name.clone()) {
                return Err(TopologyError::DuplicateNode(name));
            }
            names.insert(node.id, name.clone());
            topology.add_node(name);
        }

        for edge in &self.edges {
            let a = names
                .get(&edge.source)
                .ok_or(TopologyError::UnknownNodeId(edge.source))?;
            let b = names
                .get(&edge.target)
                .ok_or(TopologyError::UnknownNodeId(edge.target))?;
            topology.add_edge(edge_attributes(a, b, &edge.attributes)?);
        }

        Ok(topology)
    }
}

fn edge_attributes(
    a: &str,
    b: &str,
    attributes: &HashMap<String, String>,
) -> Result<TopologyEdge, TopologyError> {
    let invalid = |key: &str, value: &str, reason: String| TopologyError::InvalidEdgeAttribute {
        from: a.to_string(),
        to: b.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason,
    };

    let mut edge = TopologyEdge::new(a, b);

    if let Some(value) = attributes.get("weight") {
        edge = edge.with_weight(parse_weight(value).map_err(|e| invalid("weight", value.as_str(), e))?);
    }
    if let Some(value) = attributes.get("bandwidth") {
        edge = edge.with_bandwidth(parse_bandwidth(value).map_err(|e| invalid("bandwidth", value.as_str(), e))?);
    }
    for key in ["delay", "latency"] {
        if let Some(value) = attributes.get(key) {
            edge = edge.with_delay(parse_delay(value).map_err(|e| invalid(key, value.as_str(), e))?);
            break;
        }
    }

    Ok(edge)
}

/// Largest interface cost ospf6d accepts
const MAX_OSPF_COST: u32 = 65535;

/// Whole metric in `1..=65535`. Graph tools often write `10.0` for `10`.
fn parse_weight(value: &str) -> Result<u32, String> {
    let weight = match value.parse::<u32>() {
        Ok(weight) => weight,
        Err(_) => match value.parse::<f64>() {
            Ok(w) if w.fract() == 0.0 && w >= 1.0 && w <= MAX_OSPF_COST as f64 => w as u32,
            Ok(_) => 0,
            Err(_) => return Err("not a number".to_string()),
        },
    };
    if (1..=MAX_OSPF_COST).contains(&weight) {
        Ok(weight)
    } else {
        Err(format!(
            "weight must be a whole number between 1 and {}",
            MAX_OSPF_COST
        ))
    }
}
