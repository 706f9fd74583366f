//! Render-only HTML view.
//!
//! [`render_page`] draws a config into a [`DisplayList`] and embeds it, with
//! a small canvas player, into a standalone document. The browser preview
//! loads it in an iframe and the capture path loads it in a headless tab.
//!
//! The player sizes `#wallpaperCanvas` (initially 0 x 0) to the wallpaper
//! size, replays every operation and then sets `data-ready="1"`, which is
//! what the capture path waits for.

use chrono::{DateTime, FixedOffset};

use crate::config::WallpaperConfig;
use crate::error::Error;
use crate::styles;
use crate::surface::DisplayList;

/// DOM id of the wallpaper canvas.
pub const CANVAS_ID: &str = "wallpaperCanvas";

/// Draw `config` at `now` into a fresh display list.
pub fn display_list(config: &WallpaperConfig, now: DateTime<FixedOffset>) -> DisplayList {
    let mut list = DisplayList::new(config.width, config.height);
    styles::render(&mut list, config, now);
    list
}

/// Build the render-only HTML document for `config` at `now`.
pub fn render_page(config: &WallpaperConfig, now: DateTime<FixedOffset>) -> Result<String, Error> {
    let list = display_list(config, now);
    let json = script_safe(&list.to_json()?);

    let mut html = String::with_capacity(PLAYER.len() + json.len() + 512);
    html.push_str("<!DOCTYPE html>\n<html lang=\"");
    html.push_str(config.language.as_str());
    html.push_str("\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>{} wallpaper</title>\n<style>html,body{{margin:0;padding:0;background:{};overflow:hidden}}canvas{{display:block;max-width:100vw;max-height:100vh;margin:0 auto}}</style>\n",
        config.kind, config.theme.bg
    ));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!(
        "<canvas id=\"{}\" width=\"0\" height=\"0\"></canvas>\n",
        CANVAS_ID
    ));
    html.push_str("<script>\nconst DISPLAY_LIST = ");
    html.push_str(&json);
    html.push_str(";\n");
    html.push_str(PLAYER);
    html.push_str("</script>\n</body>\n</html>\n");

    tracing::debug!("Built wallpaper page: {} bytes", html.len());
    Ok(html)
}

/// Make JSON safe to place inside a `<script>` element.
///
/// `<`, `>` and `&` become unicode escapes so no user text can close the
/// element; U+2028 / U+2029 are escaped for older JS parsers.
fn script_safe(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

const PLAYER: &str = r#"(function () {
  const FONTS = {
    sans: '-apple-system, "PingFang SC", "Helvetica Neue", "Microsoft YaHei", "Noto Sans CJK SC", sans-serif',
    mono: '"SF Mono", Menlo, Consolas, "Liberation Mono", monospace'
  };
  const canvas = document.getElementById('wallpaperCanvas');
  canvas.width = DISPLAY_LIST.width;
  canvas.height = DISPLAY_LIST.height;
  const ctx = canvas.getContext('2d');

  function rgba(paint) {
    const hex = paint.color;
    const r = parseInt(hex.slice(1, 3), 16);
    const g = parseInt(hex.slice(3, 5), 16);
    const b = parseInt(hex.slice(5, 7), 16);
    return 'rgba(' + r + ',' + g + ',' + b + ',' + paint.alpha + ')';
  }

  function style(paint) {
    ctx.shadowBlur = paint.glow;
    ctx.shadowColor = paint.glow > 0 ? paint.color : 'transparent';
    ctx.fillStyle = rgba(paint);
    ctx.strokeStyle = rgba(paint);
  }

  function rectPath(op) {
    ctx.beginPath();
    if (op.radius > 0 && ctx.roundRect) {
      ctx.roundRect(op.x, op.y, op.w, op.h, op.radius);
    } else {
      ctx.rect(op.x, op.y, op.w, op.h);
    }
  }

  for (const op of DISPLAY_LIST.ops) {
    ctx.save();
    switch (op.op) {
      case 'fill_rect':
        style(op.paint);
        rectPath(op);
        ctx.fill();
        break;
      case 'stroke_rect':
        style(op.paint);
        ctx.lineWidth = op.line_width;
        rectPath(op);
        ctx.stroke();
        break;
      case 'gradient_rect': {
        const grad = ctx.createLinearGradient(0, op.y, 0, op.y + op.h);
        grad.addColorStop(0, rgba(op.top));
        grad.addColorStop(1, rgba(op.bottom));
        ctx.fillStyle = grad;
        ctx.fillRect(op.x, op.y, op.w, op.h);
        break;
      }
      case 'fill_circle':
        style(op.paint);
        ctx.beginPath();
        ctx.arc(op.cx, op.cy, Math.max(op.r, 0), 0, Math.PI * 2);
        ctx.fill();
        break;
      case 'stroke_arc':
        style(op.paint);
        ctx.lineWidth = op.line_width;
        ctx.lineCap = 'round';
        ctx.beginPath();
        ctx.arc(op.cx, op.cy, Math.max(op.r, 0), op.start, op.end);
        ctx.stroke();
        break;
      case 'line':
        style(op.paint);
        ctx.lineWidth = op.line_width;
        ctx.beginPath();
        ctx.moveTo(op.x1, op.y1);
        ctx.lineTo(op.x2, op.y2);
        ctx.stroke();
        break;
      case 'text':
        style(op.paint);
        ctx.font = op.font.weight + ' ' + op.font.size + 'px ' + FONTS[op.font.family];
        ctx.textAlign = op.align;
        ctx.textBaseline = 'middle';
        ctx.fillText(op.text, op.x, op.y);
        break;
    }
    ctx.restore();
  }

  canvas.dataset.ready = '1';
})();
"#;

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::config::WallpaperType;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 10, 16, 9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_page_structure() {
        let config = WallpaperConfig::default().with_size(800, 1600);
        let html = render_page(&config, now()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<canvas id="wallpaperCanvas" width="0" height="0">"#));
        assert!(html.contains(r#"const DISPLAY_LIST = {"width":800,"height":1600,"ops":["#));
        assert!(html.contains("canvas.dataset.ready = '1'"));
        assert!(html.contains("background:#000000"));
    }

    #[test]
    fn test_user_text_cannot_break_out_of_script() {
        let config = WallpaperConfig::default()
            .with_kind(WallpaperType::Goal)
            .with_goal("2030-01-01", "</script><img src=x onerror=alert(1)>");
        let html = render_page(&config, now()).unwrap();
        assert_eq!(html.matches("</script>").count(), 1);
        assert!(!html.contains("<img"));
        assert!(html.contains("\\u003c/script\\u003e"));
    }

    #[test]
    fn test_script_safe() {
        assert_eq!(script_safe("a<b>&c\u{2028}"), "a\\u003cb\\u003e\\u0026c\\u2028");
        assert_eq!(script_safe(r#"{"x":1}"#), r#"{"x":1}"#);
    }

    #[test]
    fn test_display_list_matches_config_size() {
        let config = WallpaperConfig::default().with_size(320, 480);
        let list = display_list(&config, now());
        assert_eq!(list.to_json().unwrap().get(..25), Some(r#"{"width":320,"height":480"#));
        assert!(!list.ops().is_empty());
    }
}
