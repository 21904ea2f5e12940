//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Webview bridge configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[library]
# path = "/opt/webview/libwebview.so"   # explicit library file
# use_env_override = true               # honour WEBVIEW_PATH
# search_dirs = ["build"]               # searched for the platform default name

[window]
# title = "Webview"
# width = 800            # 1-16384
# height = 600           # 1-16384
# size_hint = "none"     # none | min | max | fixed
# debug = false
# frame = true
# opacity = 1.0          # 0.0-1.0
# pixel_transparency = false
# always_on_top = false
# click_through = false
# init_scripts = []
# url = "https://example.com"

# [browser]              # only applied when the native library supports it
# enable_autoplay = true
# mute_autoplay = false
# custom_flags = ["--autoplay-policy=no-user-gesture-required"]

[bridge]
# worker_threads = 2     # 1-64
# pump_interval_ms = 16  # 1-1000

[logging]
# level = "INFO"         # TRACE | DEBUG | INFO | WARNING | ERROR
"##
    .to_string()
}
