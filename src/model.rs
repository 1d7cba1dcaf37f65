use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 解析后的规范请求模型，curl 与 .http 两种输入最终都产出它
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestModel {
    /// 请求名称（仅 .http 文件）
    pub name: Option<String>,

    /// HTTP 方法，始终为大写，解析完成后不会为空
    pub method: String,

    /// 请求 URL，可能已经带有查询串
    pub url: String,

    /// Headers 列表，保持原始顺序与大小写
    pub headers: HeaderList,

    /// 从最终 URL 的查询串推导出的参数
    pub query_params: IndexMap<String, String>,

    /// 请求体，同一时刻只有一种表示形式
    pub body: RequestBody,

    /// 是否跟随重定向
    pub follow_redirects: bool,

    /// 认证信息
    pub auth: Auth,

    /// 转换后的响应脚本（仅 .http 文件）
    pub post_script: Option<String>,
}

impl RequestModel {
    /// 创建一个 GET、空 URL 的默认请求
    pub fn new() -> Self {
        Self {
            name: None,
            method: "GET".to_string(),
            url: String::new(),
            headers: HeaderList::new(),
            query_params: IndexMap::new(),
            body: RequestBody::None,
            follow_redirects: false,
            auth: Auth::None,
            post_script: None,
        }
    }

    /// 按最终 URL 重新计算 query_params
    pub fn sync_query_params(&mut self) {
        self.query_params = query_params_of(&self.url);
    }

    pub fn raw_body(&self) -> Option<&str> {
        match &self.body {
            RequestBody::Raw(text) => Some(text),
            _ => None,
        }
    }

    pub fn url_encoded_fields(&self) -> &[(String, String)] {
        match &self.body {
            RequestBody::UrlEncoded(pairs) => pairs,
            _ => &[],
        }
    }

    pub fn form_fields(&self) -> &[(String, String)] {
        match &self.body {
            RequestBody::Multipart { fields, .. } => fields,
            _ => &[],
        }
    }

    pub fn form_files(&self) -> &[(String, String)] {
        match &self.body {
            RequestBody::Multipart { files, .. } => files,
            _ => &[],
        }
    }

    pub fn auth_type(&self) -> AuthType {
        self.auth.kind()
    }

    /// 查找 Content-Type（忽略大小写）
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type")
    }
}

impl Default for RequestModel {
    fn default() -> Self {
        Self::new()
    }
}

/// 请求体的几种互斥表示
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum RequestBody {
    #[default]
    None,

    /// 未拆分的原始文本
    Raw(String),

    /// application/x-www-form-urlencoded 键值对
    UrlEncoded(Vec<(String, String)>),

    /// multipart/form-data：文本字段与文件引用（key, path）
    Multipart {
        fields: Vec<(String, String)>,
        files: Vec<(String, String)>,
    },
}

impl RequestBody {
    pub fn is_none(&self) -> bool {
        matches!(self, RequestBody::None)
    }

    /// 用于日志与表格输出的简短名称
    pub fn kind(&self) -> &'static str {
        match self {
            RequestBody::None => "none",
            RequestBody::Raw(_) => "raw",
            RequestBody::UrlEncoded(_) => "urlencoded",
            RequestBody::Multipart { .. } => "multipart",
        }
    }
}

/// 认证信息，按类型互斥
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Auth {
    #[default]
    None,
    Basic {
        username: String,
        password: String,
    },
    Bearer {
        token: String,
    },
    /// 继承上级集合的认证设置
    Inherit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    None,
    Basic,
    Bearer,
    Inherit,
}

impl Auth {
    pub fn kind(&self) -> AuthType {
        match self {
            Auth::None => AuthType::None,
            Auth::Basic { .. } => AuthType::Basic,
            Auth::Bearer { .. } => AuthType::Bearer,
            Auth::Inherit => AuthType::Inherit,
        }
    }
}

/// 有序、保留大小写的 Header 列表
///
/// 重复的 `Cookie` 会被合并为一条（以 `; ` 连接），其余同名 Header 追加保存。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderList(Vec<(String, String)>);

impl HeaderList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 添加一个 Header，Cookie 按合并语义处理
    pub fn append(&mut self, name: &str, value: &str) {
        if name.eq_ignore_ascii_case("cookie") {
            if let Some((_, existing)) = self
                .0
                .iter_mut()
                .find(|(k, _)| k.eq_ignore_ascii_case("cookie"))
            {
                if existing.is_empty() {
                    *existing = value.to_string();
                } else if !value.is_empty() {
                    existing.push_str("; ");
                    existing.push_str(value);
                }
                return;
            }
        }
        self.0.push((name.to_string(), value.to_string()));
    }

    /// 覆盖同名 Header（忽略大小写），不存在时追加
    pub fn set(&mut self, name: &str, value: &str) {
        self.remove(name);
        self.0.push((name.to_string(), value.to_string()));
    }

    /// 获取第一个同名 Header 的值
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// 删除所有同名 Header，返回删除的数量
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        before - self.0.len()
    }

    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.0.retain(|(k, v)| keep(k, v));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 把 URL 的查询串拆成键值对；`key` 单独出现时值为空
pub fn query_params_of(url: &str) -> IndexMap<String, String> {
    let Some((_, query)) = url.split_once('?') else {
        return IndexMap::new();
    };
    let query = query.split('#').next().unwrap_or_default();

    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
