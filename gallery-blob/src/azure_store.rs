use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{header, Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    BlobError, BlobInfo, BlobResult, BlobStore, ByteStream, PutResult, StorageConfig,
};

const API_VERSION: &str = "2021-08-06";

/// Azure Blob Storage over its REST API, authorised by a SAS token
#[derive(Clone)]
pub struct AzureBlobStore {
    client: Client,
    config: StorageConfig,
}

impl AzureBlobStore {
    pub fn new(config: StorageConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: StorageConfig) -> Self {
        for setting in config.missing() {
            warn!(setting, "storage setting is empty; gateway calls will fail");
        }
        Self { client, config }
    }

    fn container_url(&self) -> String {
        format!("{}/{}", self.config.service_url(), self.config.container)
    }

    fn blob_url(&self, key: &str) -> String {
        format!("{}/{}", self.container_url(), encode_key(key))
    }

    /// Append the SAS token to a URL that may already carry a query
    fn signed(&self, url: String) -> String {
        let sas = self.config.sas_query();
        if sas.is_empty() {
            url
        } else if url.contains('?') {
            format!("{url}&{sas}")
        } else {
            format!("{url}?{sas}")
        }
    }

    async fn collect_stream(&self, stream: &mut ByteStream) -> BlobResult<Vec<u8>> {
        let mut data = Vec::new();
        while let Some(chunk) = stream.next().await {
            data.extend_from_slice(&chunk?);
        }
        Ok(data)
    }

    async fn list_page(&self, marker: Option<&str>) -> BlobResult<ListPage> {
        let mut url = format!("{}?restype=container&comp=list", self.container_url());
        if let Some(marker) = marker {
            url.push_str("&marker=");
            url.push_str(&urlencoding::encode(marker));
        }

        let res = self
            .client
            .get(self.signed(url))
            .header("x-ms-version", API_VERSION)
            .send()
            .await?;
        let res = check(&self.config.container, res).await?;
        let body = res.text().await?;

        parse_list_page(&body)
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn list(&self) -> BlobResult<Vec<BlobInfo>> {
        let mut blobs = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self.list_page(marker.as_deref()).await?;
            debug!(count = page.blobs.len(), "listed blob page");
            blobs.extend(page.blobs);

            match page.next_marker {
                Some(next) => marker = Some(next),
                None => break,
            }
        }

        Ok(blobs)
    }

    async fn put(
        &self,
        key: &str,
        content_type: &str,
        mut stream: ByteStream,
    ) -> BlobResult<PutResult> {
        let data = self.collect_stream(&mut stream).await?;
        let size_bytes = data.len() as u64;

        let res = self
            .client
            .put(self.signed(self.blob_url(key)))
            .header("x-ms-version", API_VERSION)
            .header("x-ms-blob-type", "BlockBlob")
            .header("x-ms-blob-content-type", content_type)
            .header(header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await?;
        let res = check(key, res).await?;

        let etag = res
            .headers()
            .get(header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        Ok(PutResult { etag, size_bytes })
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        let res = self
            .client
            .delete(self.signed(self.blob_url(key)))
            .header("x-ms-version", API_VERSION)
            .send()
            .await?;
        check(key, res).await?;
        Ok(())
    }

    fn url(&self, key: &str) -> String {
        self.signed(self.blob_url(key))
    }
}

async fn check(key: &str, res: Response) -> BlobResult<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(BlobError::not_found(key));
    }

    let code = res
        .headers()
        .get("x-ms-error-code")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let message = match code {
        Some(code) => code,
        None => status.canonical_reason().unwrap_or("unexpected status").to_string(),
    };
    Err(BlobError::status(status.as_u16(), message))
}

/// Percent-encode each path segment, keeping `/` as a virtual directory separator
pub(crate) fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn parse_http_date(value: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.timestamp())
}

#[derive(Debug)]
pub(crate) struct ListPage {
    pub blobs: Vec<BlobInfo>,
    pub next_marker: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EnumerationResults {
    #[serde(rename = "Blobs", default)]
    blobs: BlobsXml,
    #[serde(rename = "NextMarker", default)]
    next_marker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BlobsXml {
    #[serde(rename = "Blob", default)]
    blob: Vec<BlobXml>,
}

#[derive(Debug, Deserialize)]
struct BlobXml {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Properties", default)]
    properties: PropertiesXml,
}

#[derive(Debug, Default, Deserialize)]
struct PropertiesXml {
    #[serde(rename = "Last-Modified", default)]
    last_modified: Option<String>,
    #[serde(rename = "Etag", default)]
    etag: Option<String>,
    #[serde(rename = "Content-Length", default)]
    content_length: Option<String>,
    #[serde(rename = "Content-Type", default)]
    content_type: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn parse_list_page(body: &str) -> BlobResult<ListPage> {
    let body = body.trim_start_matches('\u{feff}');
    let results: EnumerationResults = quick_xml::de::from_str(body)?;

    let blobs = results
        .blobs
        .blob
        .into_iter()
        .map(|blob| {
            let props = blob.properties;
            let size = props
                .content_length
                .as_deref()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0);

            let mut info = BlobInfo::new(blob.name, size);
            if let Some(ct) = non_empty(props.content_type) {
                info = info.with_content_type(ct);
            }
            if let Some(etag) = non_empty(props.etag) {
                info = info.with_etag(etag);
            }
            if let Some(at) = props.last_modified.as_deref().and_then(parse_http_date) {
                info = info.with_last_modified(at);
            }
            info
        })
        .collect();

    Ok(ListPage {
        blobs,
        next_marker: non_empty(results.next_marker),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<EnumerationResults ServiceEndpoint="https://acme.blob.core.windows.net/" ContainerName="media">
  <Blobs>
    <Blob>
      <Name>1700000000000-cat.png</Name>
      <Properties>
        <Last-Modified>Tue, 14 Nov 2023 22:13:20 GMT</Last-Modified>
        <Etag>0x8DBE5</Etag>
        <Content-Length>2048</Content-Length>
        <Content-Type>image/png</Content-Type>
        <BlobType>BlockBlob</BlobType>
      </Properties>
    </Blob>
    <Blob>
      <Name>notes</Name>
      <Properties>
        <Content-Length>3</Content-Length>
        <Content-Type />
      </Properties>
    </Blob>
  </Blobs>
  <NextMarker>2!88!MDAwMDE</NextMarker>
</EnumerationResults>"#;

    #[test]
    fn parses_blob_listing() {
        let page = parse_list_page(PAGE).unwrap();
        assert_eq!(page.blobs.len(), 2);

        let cat = &page.blobs[0];
        assert_eq!(cat.key, "1700000000000-cat.png");
        assert_eq!(cat.size_bytes, 2048);
        assert_eq!(cat.content_type.as_deref(), Some("image/png"));
        assert_eq!(cat.etag.as_deref(), Some("0x8DBE5"));
        assert_eq!(cat.last_modified, Some(1_700_000_000));

        assert_eq!(page.blobs[1].content_type, None);
        assert_eq!(page.next_marker.as_deref(), Some("2!88!MDAwMDE"));
    }

    #[test]
    fn empty_next_marker_ends_listing() {
        let body = r#"<EnumerationResults><Blobs /><NextMarker /></EnumerationResults>"#;
        let page = parse_list_page(body).unwrap();
        assert!(page.blobs.is_empty());
        assert!(page.next_marker.is_none());
    }

    #[test]
    fn blob_url_encodes_segments_and_carries_sas() {
        let store = AzureBlobStore::new(StorageConfig::new("acme", "media", "?sv=2022&sig=abc"));
        assert_eq!(
            store.url("albums/1-my song.mp3"),
            "https://acme.blob.core.windows.net/media/albums/1-my%20song.mp3?sv=2022&sig=abc"
        );
    }

    #[test]
    fn url_without_sas_has_no_query() {
        let store = AzureBlobStore::new(StorageConfig::new("acme", "media", ""));
        assert_eq!(store.url("a.png"), "https://acme.blob.core.windows.net/media/a.png");
    }
}
