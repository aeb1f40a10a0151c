use std::collections::HashMap;

use bytes::Bytes;
use http_body_util::Full;
use hyper::{header, Response as HttpResponse, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::middleware::Response;

/// 응답 생성 관련 에러입니다.
///
/// 직렬화가 실패하면 본문을 일부라도 쓰지 않고 호출자에게 명시적으로
/// 실패를 돌려줍니다.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("응답 직렬화 실패: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("응답 생성 실패: {0}")]
    Http(#[from] hyper::http::Error),
}

/// text/plain 응답을 만듭니다.
pub fn plain_response(status: StatusCode, body: impl Into<Bytes>) -> Response {
    HttpResponse::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(body.into()))
        .unwrap_or_else(|_| HttpResponse::new(Full::new(Bytes::from("Internal Server Error"))))
}

/// 페이로드를 JSON으로 직렬화한 응답을 만듭니다.
pub fn json_response<T: Serialize>(
    status: StatusCode,
    payload: &T,
) -> Result<Response, ResponseError> {
    let body = serde_json::to_vec(payload)?;
    let response = HttpResponse::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))?;
    Ok(response)
}

/// `{"error": <msg>}` 형태의 JSON 에러 응답을 만듭니다.
pub fn error_response(status: StatusCode, msg: &str) -> Result<Response, ResponseError> {
    let mut body = HashMap::new();
    body.insert("error", msg);
    json_response(status, &body)
}

/// 구조화된 에러 본문입니다.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: i64,
    pub message: String,
    pub code_name: String,
    pub errors: HashMap<String, String>,
}

impl Default for ErrorDetail {
    fn default() -> Self {
        ErrorDetail {
            code: 99999,
            message: "Internal Server Error".to_string(),
            code_name: "internal_server_error".to_string(),
            errors: HashMap::new(),
        }
    }
}

/// 필드별 오류 맵을 포함한 구조화된 에러 응답을 만듭니다.
/// `detail`이 없으면 기본 내부 오류 본문이 사용됩니다.
pub fn error_detail_response(
    status: StatusCode,
    errors: HashMap<String, String>,
    detail: Option<ErrorDetail>,
) -> Result<Response, ResponseError> {
    let mut detail = detail.unwrap_or_default();
    detail.errors = errors;
    json_response(status, &detail)
}

/// 직렬화 실패를 500 응답으로 변환합니다. 핸들러의 최종 폴백 전용.
pub fn serialization_error_response(err: &ResponseError) -> Response {
    plain_response(StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", err))
}

/// 페이지네이션 응답 봉투입니다.
///
/// 파생 필드는 `finalize`에서 계산되며, 같은 입력에 대해 항상 같은
/// 결과를 냅니다.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Pagination {
    pub total_pages: i64,
    pub total: i64,
    pub current_page: i64,
    pub from: i64,
    pub to: i64,
    pub offset: i64,
    pub limit: i64,
    pub per_page: i64,
    pub path: String,
    pub first_page_url: String,
    pub next_page_url: String,
    pub last_page_url: String,
    pub prev_page_url: String,
    pub data: Value,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            total_pages: 0,
            total: 0,
            current_page: 0,
            from: 0,
            to: 0,
            offset: 0,
            limit: 0,
            per_page: 0,
            path: String::new(),
            first_page_url: String::new(),
            next_page_url: String::new(),
            last_page_url: String::new(),
            prev_page_url: String::new(),
            data: Value::Null,
        }
    }
}

/// 페이지네이션 계산에 필요한 입력값입니다.
#[derive(Debug, Clone, Default)]
pub struct PaginationOptions {
    pub page: i64,
    pub limit: i64,
    pub skip: i64,
    pub total: i64,
    pub path: String,
    pub payload: Value,
}

impl Pagination {
    pub fn from_options(options: PaginationOptions) -> Self {
        let mut pagination = Pagination {
            current_page: options.page,
            limit: options.limit,
            offset: options.skip,
            total: options.total,
            path: options.path,
            data: options.payload,
            ..Default::default()
        };
        pagination.finalize();
        pagination
    }

    fn data_len(&self) -> i64 {
        self.data.as_array().map(|a| a.len() as i64).unwrap_or(0)
    }

    /// 파생 필드를 계산합니다. 같은 입력에서 몇 번을 호출해도 결과는
    /// 동일합니다.
    pub fn finalize(&mut self) {
        let total_pages = if self.limit > 0 {
            (self.total + self.limit - 1) / self.limit
        } else {
            0
        };
        let len = self.data_len();

        self.total_pages = total_pages;
        self.per_page = len;
        self.to = self.offset + len;

        let page_url = |page: i64| format!("{}?page={}&limit={}", self.path, page, self.limit);

        self.from = 1;
        self.first_page_url = String::new();
        self.prev_page_url = String::new();
        if self.current_page > 1 {
            self.from = self.offset + 1;
            self.first_page_url = page_url(1);
            self.prev_page_url = page_url(self.current_page - 1);
        }

        self.last_page_url = String::new();
        self.next_page_url = String::new();
        if self.current_page < total_pages {
            self.last_page_url = page_url(total_pages);
            self.next_page_url = page_url(self.current_page + 1);
        }
    }
}

/// 페이지네이션 봉투를 JSON 응답으로 만듭니다.
pub fn paginated_response(
    status: StatusCode,
    options: PaginationOptions,
) -> Result<Response, ResponseError> {
    json_response(status, &Pagination::from_options(options))
}

/// 쿼리 문자열에서 `(skip, limit, page)`를 파싱합니다.
/// 기본값은 page 1, limit 20이며 잘못된 값은 무시됩니다.
pub fn page_options(query: &str) -> (i64, i64, i64) {
    let mut page: i64 = 1;
    let mut limit: i64 = 20;

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "page" => {
                if let Ok(p) = value.parse() {
                    page = p;
                }
            }
            "limit" => {
                if let Ok(l) = value.parse() {
                    limit = l;
                }
            }
            _ => {}
        }
    }

    let skip = (page - 1) * limit;
    (skip, limit, page)
}
