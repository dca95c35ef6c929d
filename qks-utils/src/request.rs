use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Method, Response,
};
use std::time::Duration;
use tracing::debug;

#[allow(async_fn_in_trait)]
pub trait FromResponse: Sized {
    async fn from_response(response: Response) -> Result<Self>;
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status().as_u16();
    if !(200..=299).contains(&status) {
        let msg = match response.text().await {
            Ok(msg) => msg,
            Err(_) => "".to_string(),
        };
        return Err(anyhow!("Request error (status: {}, body: {})", status, msg));
    }
    Ok(response)
}

impl FromResponse for Vec<u8> {
    async fn from_response(response: Response) -> Result<Self> {
        Ok(check_status(response).await?.bytes().await?.to_vec())
    }
}

impl FromResponse for String {
    async fn from_response(response: Response) -> Result<Self> {
        Ok(check_status(response).await?.text().await?)
    }
}

async fn call<T: FromResponse>(
    method: Method,
    url: &str,
    body: Option<String>,
    headers: Option<HeaderMap>,
) -> Result<T> {
    debug!("{} {}", method, url);
    let client = reqwest::Client::new();
    let mut request_builder = client.request(method, url);

    if let Some(b) = body {
        request_builder = request_builder.body(b);
    }

    if let Some(h) = headers {
        request_builder = request_builder.headers(h);
    }

    let response = request_builder
        .send()
        .await
        .map_err(|e| anyhow!("Failed to reach {}: {}", url, e))?;
    T::from_response(response).await
}

pub async fn get<T: FromResponse>(
    url: &str,
    headers: Option<Vec<(String, String)>>,
) -> Result<T> {
    let headers = convert_headers(headers)?;
    call::<T>(Method::GET, url, None, headers).await
}

pub async fn post<T: FromResponse>(
    url: &str,
    body: &str,
    headers: Option<Vec<(String, String)>>,
) -> Result<T> {
    let headers = convert_headers(headers)?;
    call::<T>(Method::POST, url, Some(body.to_string()), headers).await
}

pub async fn sleep(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

fn convert_headers(headers_option: Option<Vec<(String, String)>>) -> Result<Option<HeaderMap>> {
    headers_option
        .map(|headers_map| {
            let mut headers = HeaderMap::new();
            for (key, value) in headers_map {
                let header_name = HeaderName::from_bytes(key.as_bytes())
                    .map_err(|_| anyhow!("Invalid header name: {}", key))?;
                let header_value = HeaderValue::from_str(&value)
                    .map_err(|_| anyhow!("Invalid header value for {}", key))?;
                headers.insert(header_name, header_value);
            }
            Ok(headers)
        })
        .transpose()
}
