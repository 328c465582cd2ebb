//! 렌더링 옵션(device info) XML 조각 빌더
//!
//! `Render2`, `RenderStream`, `GetRenderResource`는 렌더링 확장에 전달할 옵션을
//! `<DeviceInfo>…</DeviceInfo>` 형태의 인라인 XML 문자열로 받습니다.
//! [`DeviceInfo`]는 삽입 순서를 보존하는 중첩 매핑이며, [`render_xml_options`]가
//! 이를 재귀적으로 XML로 변환합니다.
//!
//! ## 변환 규칙
//!
//! - 불리언 → 소문자 `true` / `false`
//! - 중첩 매핑 → 중첩 태그
//! - 스칼라 값 → 치환 토큰([`SESSION_ID_PLACEHOLDER`], [`TIME_PLACEHOLDER`]) 치환 후 엔티티 이스케이프
//! - 키 → `[A-Za-z0-9_-]` 이외 문자의 연속 구간을 `_` 하나로 치환

use crate::constants::{DEVICE_INFO_ROOT, SESSION_ID_PLACEHOLDER, TIME_PLACEHOLDER};
use crate::wire::XmlWriter;

/// device info 매핑의 값
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceInfoValue {
    /// `true` / `false`로 렌더링되는 불리언
    Bool(bool),
    /// 치환 및 이스케이프를 거치는 스칼라 문자열
    Text(String),
    /// 중첩 태그로 렌더링되는 하위 매핑
    Nested(DeviceInfo),
}

impl From<bool> for DeviceInfoValue {
    fn from(value: bool) -> Self {
        DeviceInfoValue::Bool(value)
    }
}

impl From<&str> for DeviceInfoValue {
    fn from(value: &str) -> Self {
        DeviceInfoValue::Text(value.to_string())
    }
}

impl From<String> for DeviceInfoValue {
    fn from(value: String) -> Self {
        DeviceInfoValue::Text(value)
    }
}

impl From<i64> for DeviceInfoValue {
    fn from(value: i64) -> Self {
        DeviceInfoValue::Text(value.to_string())
    }
}

impl From<i32> for DeviceInfoValue {
    fn from(value: i32) -> Self {
        DeviceInfoValue::Text(value.to_string())
    }
}

impl From<u32> for DeviceInfoValue {
    fn from(value: u32) -> Self {
        DeviceInfoValue::Text(value.to_string())
    }
}

impl From<DeviceInfo> for DeviceInfoValue {
    fn from(value: DeviceInfo) -> Self {
        DeviceInfoValue::Nested(value)
    }
}

/// 삽입 순서를 보존하는 렌더링 옵션 매핑
///
/// 같은 키를 다시 넣으면 기존 위치에서 값만 교체됩니다.
///
/// # 예시
///
/// ```
/// use ssrs::device_info::DeviceInfo;
///
/// let info = DeviceInfo::new()
///     .with("Toolbar", false)
///     .with("Section", 1)
///     .with("StreamRoot", "/streams/_SID_/");
/// assert_eq!(info.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceInfo {
    entries: Vec<(String, DeviceInfoValue)>,
}

impl DeviceInfo {
    /// 빈 매핑을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 빌더 스타일로 항목을 추가합니다.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DeviceInfoValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// 항목을 추가하거나, 같은 키가 있으면 그 자리에서 값을 교체합니다.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DeviceInfoValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// 키로 값을 찾습니다.
    pub fn get(&self, key: &str) -> Option<&DeviceInfoValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// 항목 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 항목이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 항목을 삽입 순서로 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeviceInfoValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `defaults` 위에 이 매핑을 덮어쓴 결과를 반환합니다.
    ///
    /// 기본값의 키 순서가 먼저 오고, 같은 키는 이 매핑의 값이 이깁니다.
    pub fn merged_over(&self, defaults: &DeviceInfo) -> DeviceInfo {
        let mut merged = defaults.clone();
        for (key, value) in &self.entries {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

impl<K, V> FromIterator<(K, V)> for DeviceInfo
where
    K: Into<String>,
    V: Into<DeviceInfoValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut info = DeviceInfo::new();
        for (key, value) in iter {
            info.insert(key, value);
        }
        info
    }
}

/// 스칼라 값에 적용되는 치환 토큰 값
#[derive(Debug, Clone, Copy)]
pub struct Placeholders<'a> {
    /// [`SESSION_ID_PLACEHOLDER`] 치환 값. `None`이면 토큰을 그대로 남김
    pub session_id: Option<&'a str>,
    /// [`TIME_PLACEHOLDER`] 치환 값 (유닉스 시각, 초). `None`이면 토큰을 그대로 남김
    pub timestamp: Option<i64>,
}

impl Placeholders<'_> {
    /// 치환을 수행하지 않는 토큰 값 (토큰 자체를 그대로 남김)
    pub fn none() -> Placeholders<'static> {
        Placeholders {
            session_id: None,
            timestamp: None,
        }
    }

    /// 문자열 안의 모든 토큰을 한 번의 스캔으로 치환합니다.
    ///
    /// 치환된 결과는 다시 검사하지 않습니다.
    pub fn apply(&self, value: &str) -> String {
        let timestamp = self.timestamp.map(|t| t.to_string());
        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while !rest.is_empty() {
            if let Some(tail) = rest.strip_prefix(SESSION_ID_PLACEHOLDER) {
                out.push_str(self.session_id.unwrap_or(SESSION_ID_PLACEHOLDER));
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix(TIME_PLACEHOLDER) {
                out.push_str(timestamp.as_deref().unwrap_or(TIME_PLACEHOLDER));
                rest = tail;
            } else {
                let mut chars = rest.chars();
                if let Some(ch) = chars.next() {
                    out.push(ch);
                }
                rest = chars.as_str();
            }
        }
        out
    }
}

/// 키를 `[A-Za-z0-9_-]` 문자 집합으로 정리합니다.
///
/// 허용되지 않는 문자의 연속 구간은 `_` 하나로 합쳐집니다.
///
/// ```
/// use ssrs::device_info::sanitize_key;
///
/// assert_eq!(sanitize_key("Page Width"), "Page_Width");
/// assert_eq!(sanitize_key("a:: b"), "a_b");
/// ```
pub fn sanitize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut in_invalid_run = false;
    for ch in key.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            out.push(ch);
            in_invalid_run = false;
        } else if !in_invalid_run {
            out.push('_');
            in_invalid_run = true;
        }
    }
    out
}

/// 중첩 매핑을 태그-per-키 XML로 재귀 변환합니다.
pub fn render_xml_options(options: &DeviceInfo, placeholders: &Placeholders<'_>) -> String {
    let mut writer = XmlWriter::new();
    write_options(&mut writer, options, placeholders);
    writer.into_string()
}

fn write_options(writer: &mut XmlWriter, options: &DeviceInfo, placeholders: &Placeholders<'_>) {
    for (key, value) in options.iter() {
        let tag = sanitize_key(key);
        match value {
            DeviceInfoValue::Nested(inner) => {
                writer.open(&tag);
                write_options(writer, inner, placeholders);
                writer.close(&tag);
            }
            DeviceInfoValue::Bool(flag) => writer.bool_element(&tag, *flag),
            DeviceInfoValue::Text(text) => writer.element(&tag, &placeholders.apply(text)),
        }
    }
}

/// 옵션을 `<DeviceInfo>` 루트로 감싸 렌더링합니다.
///
/// ```
/// use ssrs::device_info::{DeviceInfo, Placeholders, render_device_info};
///
/// let info = DeviceInfo::new().with("Toolbar", false);
/// let xml = render_device_info(&info, &Placeholders { session_id: Some("abc"), timestamp: Some(0) });
/// assert_eq!(xml, "<DeviceInfo><Toolbar>false</Toolbar></DeviceInfo>");
/// ```
pub fn render_device_info(options: &DeviceInfo, placeholders: &Placeholders<'_>) -> String {
    let wrapped = DeviceInfo::new().with(DEVICE_INFO_ROOT, options.clone());
    render_xml_options(&wrapped, placeholders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ph(session_id: &str) -> Placeholders<'_> {
        Placeholders {
            session_id: Some(session_id),
            timestamp: Some(1_700_000_000),
        }
    }

    #[test]
    fn test_bool_true_renders_lowercase() {
        let info = DeviceInfo::new().with("Toolbar", true);
        assert_eq!(render_xml_options(&info, &ph("")), "<Toolbar>true</Toolbar>");
    }

    #[test]
    fn test_bool_false_renders_lowercase() {
        let info = DeviceInfo::new().with("Toolbar", false);
        assert_eq!(
            render_xml_options(&info, &ph("")),
            "<Toolbar>false</Toolbar>"
        );
    }

    #[test]
    fn test_nested_mapping_renders_nested_tags() {
        let info = DeviceInfo::new().with(
            "PageSettings",
            DeviceInfo::new().with("Width", "8.5in").with("Height", "11in"),
        );
        assert_eq!(
            render_xml_options(&info, &ph("")),
            "<PageSettings><Width>8.5in</Width><Height>11in</Height></PageSettings>"
        );
    }

    #[test]
    fn test_key_with_space_is_sanitized() {
        let info = DeviceInfo::new().with("Page Width", "8.5in");
        assert_eq!(
            render_xml_options(&info, &ph("")),
            "<Page_Width>8.5in</Page_Width>"
        );
    }

    #[test]
    fn test_sanitize_collapses_runs() {
        assert_eq!(sanitize_key("a  b"), "a_b");
        assert_eq!(sanitize_key("x<>y"), "x_y");
        assert_eq!(sanitize_key("keep-this_one9"), "keep-this_one9");
        assert_eq!(sanitize_key("ünï"), "_n_");
    }

    #[test]
    fn test_session_placeholder_substituted() {
        let info = DeviceInfo::new().with("StreamRoot", "/cache/_SID_/");
        assert_eq!(
            render_xml_options(&info, &ph("sess42")),
            "<StreamRoot>/cache/sess42/</StreamRoot>"
        );
    }

    #[test]
    fn test_time_placeholder_substituted() {
        let info = DeviceInfo::new().with("Stamp", "t=_TIME_");
        assert_eq!(
            render_xml_options(&info, &ph("x")),
            "<Stamp>t=1700000000</Stamp>"
        );
    }

    #[test]
    fn test_substitution_happens_before_escaping() {
        let info = DeviceInfo::new().with("Url", "a?s=_SID_&b=1");
        assert_eq!(
            render_xml_options(&info, &ph("<id>")),
            "<Url>a?s=&lt;id&gt;&amp;b=1</Url>"
        );
    }

    #[test]
    fn test_substituted_text_not_rescanned() {
        let placeholders = Placeholders {
            session_id: Some("_TIME_"),
            timestamp: Some(9),
        };
        assert_eq!(placeholders.apply("_SID_|_TIME_"), "_TIME_|9");
    }

    #[test]
    fn test_placeholders_none_keeps_tokens() {
        assert_eq!(Placeholders::none().apply("x_SID_y"), "x_SID_y");
        assert_eq!(Placeholders::none().apply("a_TIME_b"), "a_TIME_b");
        assert_eq!(
            render_device_info(&DeviceInfo::new().with("Stamp", "_TIME_"), &Placeholders::none()),
            "<DeviceInfo><Stamp>_TIME_</Stamp></DeviceInfo>"
        );
    }

    #[test]
    fn test_placeholders_partial_substitution() {
        let placeholders = Placeholders {
            session_id: Some("abc"),
            timestamp: None,
        };
        assert_eq!(placeholders.apply("_SID_/_TIME_"), "abc/_TIME_");
    }

    #[test]
    fn test_render_device_info_wraps_root() {
        let info = DeviceInfo::new()
            .with("HTMLFragment", true)
            .with("Section", 2);
        assert_eq!(
            render_device_info(&info, &ph("")),
            "<DeviceInfo><HTMLFragment>true</HTMLFragment><Section>2</Section></DeviceInfo>"
        );
    }

    #[test]
    fn test_render_device_info_empty() {
        assert_eq!(
            render_device_info(&DeviceInfo::new(), &ph("")),
            "<DeviceInfo></DeviceInfo>"
        );
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut info = DeviceInfo::new().with("A", "1").with("B", "2");
        info.insert("A", "3");
        let keys: Vec<&str> = info.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(info.get("A"), Some(&DeviceInfoValue::Text("3".to_string())));
    }

    #[test]
    fn test_merged_over_defaults() {
        let defaults = DeviceInfo::new().with("Toolbar", "false");
        let caller = DeviceInfo::new().with("Section", 3).with("Toolbar", true);
        let merged = caller.merged_over(&defaults);
        assert_eq!(
            render_xml_options(&merged, &ph("")),
            "<Toolbar>true</Toolbar><Section>3</Section>"
        );
    }

    #[test]
    fn test_from_iterator_preserves_order() {
        let info: DeviceInfo = vec![("Z", "1"), ("A", "2")].into_iter().collect();
        let keys: Vec<&str> = info.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Z", "A"]);
    }
}
