//! HTML rendering of the gallery page.
//!
//! Output is derived entirely from the controller's view state and item list.
//! The upload preview runs in the browser from the chosen file
//! (`URL.createObjectURL`), so selecting a file never hits the server.

use std::fmt::Write;

use gallery_core::{Classification, FilterKind, MediaItem, MediaKind, ViewState};

const TITLE: &str = "Cloud Media Gallery";
const SUBTITLE: &str = "Upload and preview images, videos, and audio stored in the cloud";

const PLACEHOLDER: &str = "data:image/svg+xml;utf8,\
<svg xmlns='http://www.w3.org/2000/svg' width='320' height='200'>\
<rect width='100%25' height='100%25' fill='%23e5e7eb'/>\
<text x='50%25' y='50%25' font-family='sans-serif' font-size='18' fill='%236b7280' \
text-anchor='middle' dominant-baseline='middle'>No file selected</text></svg>";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f8fafc; color: #111827; }
.app-container { max-width: 1100px; margin: 0 auto; padding: 24px; }
header { text-align: center; margin-bottom: 24px; }
.filter-controls { display: inline-flex; gap: 8px; align-items: center; }
.upload-area {
  display: flex; gap: 24px; align-items: center;
  background: #fff; padding: 16px; border-radius: 12px;
}
.media-preview img, .media-preview video {
  width: 320px; max-height: 200px; object-fit: cover; border-radius: 8px;
}
.upload-buttons { display: flex; flex-direction: column; gap: 8px; }
.upload-buttons label {
  cursor: pointer; padding: 6px 12px; border: 1px solid #cbd5e1; border-radius: 6px;
}
.upload-buttons input[type=file] { display: none; }
.media-gallery {
  display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr));
  gap: 16px; margin-top: 24px;
}
.media-card { background: #fff; border-radius: 12px; padding: 12px; }
.media-card img, .media-card video { width: 100%; border-radius: 8px; }
.media-card audio { width: 100%; }
.media-card p { word-break: break-all; }
.actions { display: flex; justify-content: space-between; align-items: center; }
.loading-overlay {
  position: fixed; inset: 0; background: rgba(255,255,255,.7);
  display: flex; align-items: center; justify-content: center; font-size: 1.5rem;
}
"#;

const PREVIEW_SCRIPT: &str = r#"
(function () {
  var inputs = document.querySelectorAll('.upload-buttons input[type=file]');
  var preview = document.getElementById('media-preview');
  inputs.forEach(function (input) {
    input.addEventListener('change', function () {
      inputs.forEach(function (other) { if (other !== input) { other.value = ''; } });
      var file = input.files[0];
      if (!file) { return; }
      var url = URL.createObjectURL(file);
      var kind = input.dataset.kind;
      var el;
      if (kind === 'image') { el = document.createElement('img'); el.alt = 'preview'; }
      else if (kind === 'video') { el = document.createElement('video'); el.controls = true; }
      else { el = document.createElement('audio'); el.controls = true; }
      el.src = url;
      preview.replaceChildren(el);
    });
  });
})();
"#;

/// Everything the page needs to render
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    pub state: ViewState,
    pub items: &'a [MediaItem],
    /// Message shown in a blocking `alert()` on load
    pub alert: Option<&'a str>,
}

/// Escape text for HTML element content and quoted attributes
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// String literal safe to embed inside a `<script>` block
fn script_string(input: &str) -> String {
    serde_json::to_string(input)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

pub fn gallery_page(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(4096);
    let filter = view.state.filter;

    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape(TITLE));
    let _ = writeln!(html, "<style>{STYLE}</style>\n</head>\n<body>");
    html.push_str("<div class=\"app-container\">\n");

    if view.state.is_loading {
        html.push_str("<div class=\"loading-overlay\" role=\"status\">Loading&hellip;</div>\n");
    }

    render_header(&mut html, filter);
    render_upload_form(&mut html, filter);
    render_gallery(&mut html, view.items, filter);

    html.push_str("</div>\n");
    let _ = writeln!(html, "<script>{PREVIEW_SCRIPT}</script>");
    if let Some(message) = view.alert {
        let _ = writeln!(html, "<script>alert({});</script>", script_string(message));
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn render_header(html: &mut String, filter: FilterKind) {
    html.push_str("<header>\n");
    let _ = writeln!(html, "<h1>{}</h1>", escape(TITLE));
    let _ = writeln!(html, "<p>{}</p>", escape(SUBTITLE));
    html.push_str("<form class=\"filter-controls\" method=\"get\" action=\"/\">\n");
    html.push_str("<label for=\"filter\">Filter:</label>\n");
    html.push_str("<select id=\"filter\" name=\"filter\" onchange=\"this.form.submit()\">\n");
    for (kind, label) in FilterKind::OPTIONS {
        let selected = if kind == filter { " selected" } else { "" };
        let _ = writeln!(html, "<option value=\"{}\"{selected}>{label}</option>", kind.as_str());
    }
    html.push_str("</select>\n<noscript><button type=\"submit\">Apply</button></noscript>\n");
    html.push_str("</form>\n</header>\n");
}

fn render_upload_form(html: &mut String, filter: FilterKind) {
    let _ = writeln!(
        html,
        "<form class=\"upload-area\" method=\"post\" action=\"/upload?filter={}\" \
         enctype=\"multipart/form-data\">",
        filter.as_str()
    );
    let _ = writeln!(
        html,
        "<div class=\"media-preview\" id=\"media-preview\">\
         <img src=\"{}\" alt=\"preview placeholder\"></div>",
        escape(PLACEHOLDER)
    );
    html.push_str("<div class=\"upload-buttons\">\n");
    for kind in MediaKind::ALL {
        let label = match kind {
            MediaKind::Image => "Image",
            MediaKind::Video => "Video",
            MediaKind::Audio => "Audio",
        };
        let _ = writeln!(
            html,
            "<label for=\"{kind}Input\">&#8682; {label}</label>\n\
             <input id=\"{kind}Input\" name=\"{kind}\" data-kind=\"{kind}\" \
             type=\"file\" accept=\"{accept}\">",
            kind = kind.as_str(),
            accept = kind.accept(),
        );
    }
    html.push_str("<button type=\"submit\">Upload</button>\n</div>\n</form>\n");
}

fn render_gallery(html: &mut String, items: &[MediaItem], filter: FilterKind) {
    html.push_str("<section class=\"media-gallery\">\n");
    if items.is_empty() {
        html.push_str("<h3>No Files Found</h3>\n");
    }
    for item in items {
        render_card(html, item, filter);
    }
    html.push_str("</section>\n");
}

fn render_card(html: &mut String, item: &MediaItem, filter: FilterKind) {
    let url = escape(&item.url);
    html.push_str("<div class=\"media-card\">\n");
    match item.classification() {
        Classification::Image => {
            let _ = writeln!(html, "<img src=\"{url}\" alt=\"media\" loading=\"lazy\">");
        }
        Classification::Video => {
            let _ = writeln!(html, "<video src=\"{url}\" controls preload=\"metadata\"></video>");
        }
        Classification::Audio => {
            let _ = writeln!(html, "<audio src=\"{url}\" controls preload=\"none\"></audio>");
        }
        Classification::Other => {
            let _ = writeln!(
                html,
                "<div class=\"media-other\">{}</div>",
                escape(&item.content_type)
            );
        }
    }
    let _ = writeln!(html, "<p>{}</p>", escape(item.display_name()));
    html.push_str("<div class=\"actions\">\n");
    let _ = writeln!(
        html,
        "<a href=\"{url}\" download target=\"_blank\" rel=\"noreferrer\">Download</a>"
    );
    let _ = writeln!(
        html,
        "<form method=\"post\" action=\"/delete\">\
         <input type=\"hidden\" name=\"key\" value=\"{}\">\
         <input type=\"hidden\" name=\"filter\" value=\"{}\">\
         <button type=\"submit\" title=\"Delete\">&#128465;</button></form>",
        escape(&item.name),
        filter.as_str()
    );
    html.push_str("</div>\n</div>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(filter: FilterKind, is_loading: bool) -> ViewState {
        ViewState { filter, is_loading }
    }

    #[test]
    fn empty_gallery_says_no_files() {
        let html = gallery_page(&PageView {
            state: state(FilterKind::All, false),
            items: &[],
            alert: None,
        });
        assert!(html.contains("No Files Found"));
        assert!(!html.contains("loading-overlay\" role"));
        assert!(!html.contains("alert("));
    }

    #[test]
    fn cards_use_display_name_and_escape() {
        let items = vec![
            MediaItem::new("17-<b>cat</b>.png", "https://x/17-cat.png?sig=a&b", "image/png"),
            MediaItem::new("18-song.mp3", "https://x/18-song.mp3", "audio/mpeg"),
            MediaItem::new("19-clip.mp4", "https://x/19-clip.mp4", "video/mp4"),
        ];
        let html = gallery_page(&PageView {
            state: state(FilterKind::All, false),
            items: &items,
            alert: None,
        });

        assert!(html.contains("<p>17-&lt;b&gt;cat&lt;/b&gt;</p>"));
        assert!(html.contains("<img src=\"https://x/17-cat.png?sig=a&amp;b\""));
        assert!(html.contains("<audio src=\"https://x/18-song.mp3\""));
        assert!(html.contains("<video src=\"https://x/19-clip.mp4\""));
        assert!(html.contains("value=\"17-&lt;b&gt;cat&lt;/b&gt;.png\""));
        assert!(!html.contains("No Files Found"));
    }

    #[test]
    fn selected_filter_and_loading_overlay() {
        let html = gallery_page(&PageView {
            state: state(FilterKind::Video, true),
            items: &[],
            alert: None,
        });
        assert!(html.contains("<option value=\"video\" selected>Videos</option>"));
        assert!(html.contains("<option value=\"all\">All</option>"));
        assert!(html.contains("class=\"loading-overlay\""));
        assert!(html.contains("action=\"/upload?filter=video\""));
    }

    #[test]
    fn alert_message_is_script_safe() {
        let html = gallery_page(&PageView {
            state: state(FilterKind::All, false),
            items: &[],
            alert: Some("bad \"input\" </script>"),
        });
        assert!(html.contains(r#"alert("bad \"input\" <\/script>");"#));
    }

    #[test]
    fn typed_pickers_accept_their_kind() {
        let html = gallery_page(&PageView {
            state: state(FilterKind::All, false),
            items: &[],
            alert: None,
        });
        assert!(html.contains(
            "name=\"image\" data-kind=\"image\" type=\"file\" accept=\"image/*\""
        ));
        assert!(html.contains(
            "name=\"video\" data-kind=\"video\" type=\"file\" accept=\"video/*\""
        ));
        assert!(html.contains(
            "name=\"audio\" data-kind=\"audio\" type=\"file\" accept=\"audio/*\""
        ));
    }
}
