//! 저수준 XML I/O 모듈: SOAP 응답 요소 트리 읽기와 요청 XML 쓰기
//!
//! [`parse_document`]는 XML 문서를 [`XmlNode`] 트리로 읽어 들이고,
//! [`XmlWriter`]는 요청 envelope과 device info 조각을 순차적으로 씁니다.
//!
//! ## 단일/배열 모호성
//!
//! SSRS 응답에서 반복 가능한 요소(`CatalogItem`, `ReportParameter`, `Property` 등)는
//! 항목이 하나일 때와 여러 개일 때 같은 모양으로 구분되지 않습니다.
//! 필드 단위로 보면 값이 "단일 객체" 또는 "객체 배열" 중 하나로 나타나므로
//! 이를 [`OneOrMany`]로 표현하고, [`normalize_many`] 한 곳에서만 순서 있는
//! 시퀀스로 정규화합니다. 모든 복수형 필드는 [`XmlNode::many`]를 거칩니다.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SsrsError};

/// 단일 값 또는 값 배열로 디코딩될 수 있는 필드
///
/// `serde(untagged)`이므로 JSON 등 다른 소스에서 같은 모호성을 가진
/// 필드를 역직렬화할 때도 그대로 사용할 수 있습니다.
///
/// # 예시
///
/// ```
/// use ssrs::wire::OneOrMany;
///
/// assert_eq!(OneOrMany::One(7).into_vec(), vec![7]);
/// assert_eq!(OneOrMany::Many(vec![1, 2]).into_vec(), vec![1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// 단일 객체로 디코딩된 필드
    One(T),
    /// 배열로 디코딩된 필드
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// 항목 수를 반환합니다.
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    /// 항목이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 순서를 보존하여 `Vec`으로 변환합니다.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        value.into_vec()
    }
}

/// 없음/단일/배열 중 하나로 디코딩된 필드를 순서 있는 시퀀스로 정규화합니다.
///
/// 필드가 없으면 빈 시퀀스, 단일 객체면 원소 하나짜리 시퀀스가 됩니다.
pub fn normalize_many<T>(field: Option<OneOrMany<T>>) -> Vec<T> {
    field.map(OneOrMany::into_vec).unwrap_or_default()
}

/// XML 요소 트리의 노드
///
/// 요소명은 네임스페이스 접두어를 제거한 local name으로 저장됩니다.
/// 자식 요소가 있는 노드의 텍스트(들여쓰기 공백 등)는 버려집니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// local name (예: `"CatalogItem"`)
    pub name: String,
    /// 리프 요소의 텍스트 (엔티티 해제 완료)
    pub text: String,
    /// `xsi:nil="true"` 여부
    pub nil: bool,
    /// 자식 요소 (문서 순서 보존)
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// 빈 노드를 생성합니다.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// 이름이 `name`인 첫 번째 자식을 반환합니다.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// 이름이 `name`인 모든 자식을 문서 순서로 반환합니다.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// 필드 `name`을 없음/단일/배열 중 하나로 읽습니다.
    pub fn field(&self, name: &str) -> Option<OneOrMany<&XmlNode>> {
        let mut found: Vec<&XmlNode> = self.children.iter().filter(|c| c.name == name).collect();
        match found.len() {
            0 => None,
            1 => found.pop().map(OneOrMany::One),
            _ => Some(OneOrMany::Many(found)),
        }
    }

    /// 자식 `name`의 텍스트를 반환합니다. 요소가 없거나 nil이면 `None`.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .filter(|c| !c.nil)
            .map(|c| c.text.as_str())
    }

    /// 자손 중 이름이 `name`인 첫 번째 노드를 깊이 우선으로 찾습니다.
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find(name) {
                return Some(found);
            }
        }
        None
    }

    /// 자식 `name`을 반환하고, 없으면 [`SsrsError::MissingElement`]를 반환합니다.
    pub fn require(&self, name: &str) -> Result<&XmlNode> {
        self.child(name).ok_or_else(|| SsrsError::MissingElement {
            element: name.to_string(),
            context: self.name.clone(),
        })
    }

    /// 컨테이너 `container` 아래 반복 요소 `item`을 정규화하여 디코딩합니다.
    ///
    /// 컨테이너가 없거나 nil이면 빈 시퀀스를 반환합니다.
    /// 단일/배열 정규화는 [`normalize_many`]가 담당합니다.
    pub fn many<T, F>(&self, container: &str, item: &str, decode: F) -> Result<Vec<T>>
    where
        F: FnMut(&XmlNode) -> Result<T>,
    {
        let field = match self.child(container) {
            Some(node) if !node.nil => node.field(item),
            _ => None,
        };
        normalize_many(field).into_iter().map(decode).collect()
    }
}

fn node_from_start(start: &BytesStart<'_>) -> Result<XmlNode> {
    let mut node = XmlNode::new(String::from_utf8_lossy(start.local_name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|e| SsrsError::Xml(e.to_string()))?;
        if attr.key.local_name().as_ref() == b"nil" && attr.value.as_ref() == b"true" {
            node.nil = true;
        }
    }
    Ok(node)
}

fn close_node(stack: &mut Vec<XmlNode>, root: &mut Option<XmlNode>, mut node: XmlNode) {
    if !node.children.is_empty() {
        node.text.clear();
    }
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}

/// XML 문서를 읽어 루트 요소 노드를 반환합니다.
///
/// # 에러
///
/// - [`SsrsError::Xml`]: 문법 오류, 닫히지 않은 요소, 루트 요소 없음
///
/// # 예시
///
/// ```
/// use ssrs::wire::parse_document;
///
/// let root = parse_document("<a><b>1</b><b>2</b></a>").unwrap();
/// assert_eq!(root.name, "a");
/// assert_eq!(root.children("b").count(), 2);
/// ```
pub fn parse_document(xml: &str) -> Result<XmlNode> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(node_from_start(&e)?),
            Event::Empty(e) => {
                let node = node_from_start(&e)?;
                close_node(&mut stack, &mut root, node);
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| SsrsError::Xml("unbalanced end tag".to_string()))?;
                close_node(&mut stack, &mut root, node);
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(SsrsError::Xml(format!(
            "unexpected end of document: <{}> not closed",
            stack.last().map(|n| n.name.as_str()).unwrap_or_default()
        )));
    }
    root.ok_or_else(|| SsrsError::Xml("document has no root element".to_string()))
}

/// XML 텍스트/속성 값을 이스케이프합니다 (`&`, `<`, `>`, `'`, `"`).
pub fn escape_text(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// 문자열 버퍼에 순차적으로 XML을 쓰는 writer
///
/// 태그명은 호출자가 보장하며, 텍스트 값만 이스케이프합니다.
///
/// # 예시
///
/// ```
/// use ssrs::wire::XmlWriter;
///
/// let mut w = XmlWriter::new();
/// w.open("ListChildren");
/// w.element("ItemPath", "/Sales & Ops");
/// w.close("ListChildren");
/// assert_eq!(
///     w.as_str(),
///     "<ListChildren><ItemPath>/Sales &amp; Ops</ItemPath></ListChildren>"
/// );
/// ```
#[derive(Debug, Default)]
pub struct XmlWriter {
    buf: String,
}

impl XmlWriter {
    /// 빈 writer를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// XML 선언을 씁니다.
    pub fn declaration(&mut self) {
        self.buf
            .push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    }

    /// 여는 태그를 씁니다.
    pub fn open(&mut self, tag: &str) {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push('>');
    }

    /// 기본 네임스페이스 선언을 포함한 여는 태그를 씁니다.
    pub fn open_ns(&mut self, tag: &str, namespace: &str) {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.buf.push_str(" xmlns=\"");
        self.buf.push_str(&escape_text(namespace));
        self.buf.push_str("\">");
    }

    /// 닫는 태그를 씁니다.
    pub fn close(&mut self, tag: &str) {
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
    }

    /// 텍스트 요소를 씁니다. 텍스트는 이스케이프됩니다.
    pub fn element(&mut self, tag: &str, text: &str) {
        self.open(tag);
        self.buf.push_str(&escape_text(text));
        self.close(tag);
    }

    /// 값이 있을 때만 텍스트 요소를 씁니다.
    pub fn element_opt(&mut self, tag: &str, text: Option<&str>) {
        if let Some(text) = text {
            self.element(tag, text);
        }
    }

    /// `xsd:boolean` 요소를 씁니다.
    pub fn bool_element(&mut self, tag: &str, value: bool) {
        self.element(tag, if value { "true" } else { "false" });
    }

    /// 이미 직렬화된 XML 조각을 그대로 씁니다.
    pub fn raw(&mut self, xml: &str) {
        self.buf.push_str(xml);
    }

    /// 현재까지 쓴 내용을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// 버퍼를 소비하여 `String`을 반환합니다.
    pub fn into_string(self) -> String {
        self.buf
    }
}
