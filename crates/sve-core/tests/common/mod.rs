// Hand-rolled wire builders so tests do not depend on the encoder under test.
#![allow(dead_code)]

pub fn map_start(out: &mut Vec<u8>, key: &str) {
    out.push(0x00);
    cstr(out, key);
}

pub fn map_end(out: &mut Vec<u8>) {
    out.push(0x08);
}

pub fn text(out: &mut Vec<u8>, key: &str, val: &str) {
    out.push(0x01);
    cstr(out, key);
    cstr(out, val);
}

pub fn uint(out: &mut Vec<u8>, key: &str, val: u32) {
    out.push(0x02);
    cstr(out, key);
    out.extend_from_slice(&val.to_le_bytes());
}

fn cstr(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
    out.push(0);
}

/// A record laid out exactly as the client writes it.
pub fn record(out: &mut Vec<u8>, index: u32, app_id: u32, name: &str, tags: &[&str]) {
    map_start(out, &index.to_string());
    uint(out, "appid", app_id);
    text(out, "AppName", name);
    text(out, "Exe", "\"/usr/bin/game\"");
    text(out, "StartDir", "\"/usr/bin/\"");
    text(out, "icon", "");
    text(out, "ShortcutPath", "");
    text(out, "LaunchOptions", "--fullscreen");
    uint(out, "IsHidden", 0);
    uint(out, "AllowDesktopConfig", 1);
    uint(out, "AllowOverlay", 1);
    uint(out, "OpenVR", 0);
    uint(out, "Devkit", 0);
    text(out, "DevkitGameID", "");
    uint(out, "DevkitOverrideAppID", 0);
    uint(out, "LastPlayTime", 1_700_000_000);
    text(out, "FlatpakAppID", "");
    map_start(out, "tags");
    for (i, t) in tags.iter().enumerate() {
        text(out, &i.to_string(), t);
    }
    map_end(out);
    map_end(out);
}

/// Two records, indices 0 and 1.
pub fn sample_file() -> Vec<u8> {
    let mut out = Vec::new();
    map_start(&mut out, "shortcuts");
    record(&mut out, 0, 3_000_000_001, "Game One", &["favorite", "Indie"]);
    record(&mut out, 1, 3_000_000_002, "Ünïcode Game", &[]);
    map_end(&mut out);
    map_end(&mut out);
    out
}
