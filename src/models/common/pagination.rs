use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

const MAX_PAGE_SIZE: i64 = 100;

// 分页查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(default = "default_page", deserialize_with = "lenient_i64")]
    pub page: i64,
    #[serde(default = "default_size", deserialize_with = "lenient_i64")]
    pub size: i64,
}

impl PaginationQuery {
    /// 修正越界的页码与页大小
    pub fn normalized(&self) -> (u64, u64) {
        let page = self.page.max(1) as u64;
        let size = self.size.clamp(1, MAX_PAGE_SIZE) as u64;
        (page, size)
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
        }
    }
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(page_size)
        };
        Self {
            page: page as i64,
            page_size: page_size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 查询字符串中的数字可能以字符串形式出现
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("无效的数字: '{s}'"))),
    }
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_clamps() {
        let q = PaginationQuery { page: 0, size: 1000 };
        assert_eq!(q.normalized(), (1, MAX_PAGE_SIZE as u64));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(PaginationInfo::new(1, 20, 41).total_pages, 3);
        assert_eq!(PaginationInfo::new(1, 20, 0).total_pages, 0);
    }

    #[test]
    fn test_lenient_parse() {
        let q: PaginationQuery = serde_json::from_str(r#"{"page":"2","size":5}"#).unwrap();
        assert_eq!(q.page, 2);
        assert_eq!(q.size, 5);
    }
}
