//! Bash statusline composer.
//!
//! The script is assembled from [`PRELUDE`], one display fragment per
//! selected feature (in the user's order), and [`FOOTER`]. Each fragment has
//! an `enabled` predicate over the configuration and a `render` function that
//! only reads non-feature settings (colors, labels, theme), so selecting an
//! extra feature can only add fragments.

use statusline_core::{Feature, Runtime, StatuslineConfig, Theme};

use super::ScriptComposer;
use super::segments::{
    BAR_WIDTH, EMPTY_GLYPH, FILL_GLYPH, SESSION_CRITICAL_PCT, SESSION_WARNING_PCT, SessionBand,
};
use crate::icons::{IconSet, labels_for};

/// Theme-dependent presentation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Text between two segments
    pub separator: &'static str,
    /// Whether context and session segments carry a progress bar
    pub progress_bars: bool,
    /// Shorter segment text
    pub compact: bool,
}

impl Layout {
    /// Layout for a theme; unrecognised themes render as detailed.
    pub fn for_theme(theme: &Theme) -> Self {
        match theme {
            Theme::Minimal => Self {
                separator: "  ",
                progress_bars: false,
                compact: false,
            },
            Theme::Compact => Self {
                separator: " ",
                progress_bars: true,
                compact: true,
            },
            Theme::Detailed | Theme::Other(_) => Self {
                separator: "  ",
                progress_bars: true,
                compact: false,
            },
        }
    }
}

/// Everything a fragment may read while rendering.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub config: &'a StatuslineConfig,
    pub labels: IconSet,
    pub layout: Layout,
    /// Creation timestamp for the header, if any
    pub created: Option<&'a str>,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a StatuslineConfig, created: Option<&'a str>) -> Self {
        Self {
            config,
            labels: labels_for(config),
            layout: Layout::for_theme(&config.theme),
            created,
        }
    }
}

/// One gated piece of shell source.
#[derive(Clone, Copy)]
pub struct Fragment {
    pub name: &'static str,
    pub enabled: fn(&StatuslineConfig) -> bool,
    pub render: fn(&RenderContext<'_>) -> String,
}

impl std::fmt::Debug for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fragment").field("name", &self.name).finish()
    }
}

/// Data-gathering fragments, in emission order.
pub const PRELUDE: &[Fragment] = &[
    Fragment {
        name: "header",
        enabled: always,
        render: render_header,
    },
    Fragment {
        name: "input",
        enabled: always,
        render: render_input,
    },
    Fragment {
        name: "logging",
        enabled: |c| c.logging,
        render: render_logging,
    },
    Fragment {
        name: "colors",
        enabled: always,
        render: render_colors,
    },
    Fragment {
        name: "time_helpers",
        enabled: |c| c.has(Feature::Session),
        render: render_time_helpers,
    },
    Fragment {
        name: "progress_bar",
        enabled: |c| c.has_any(&[Feature::Context, Feature::Session]),
        render: render_progress_bar,
    },
    Fragment {
        name: "format_number",
        enabled: |c| c.has(Feature::Tokens),
        render: render_format_number,
    },
    Fragment {
        name: "basics",
        enabled: |c| c.has_any(&[Feature::Directory, Feature::Model, Feature::Context]),
        render: render_basics,
    },
    Fragment {
        name: "git",
        enabled: |c| c.has(Feature::Git),
        render: render_git,
    },
    Fragment {
        name: "context",
        enabled: |c| c.has(Feature::Context),
        render: render_context,
    },
    Fragment {
        name: "cost",
        enabled: |c| c.has(Feature::Usage),
        render: render_cost,
    },
    Fragment {
        name: "ccusage_fetch",
        enabled: |c| c.ccusage_integration && c.has_any(&[Feature::Session, Feature::Tokens]),
        render: render_ccusage_fetch,
    },
    Fragment {
        name: "ccusage_tokens",
        enabled: |c| c.ccusage_integration && c.has(Feature::Tokens),
        render: render_ccusage_tokens,
    },
    Fragment {
        name: "ccusage_burn_rate",
        enabled: |c| {
            c.ccusage_integration && c.has(Feature::Tokens) && c.has(Feature::BurnRate)
        },
        render: render_ccusage_burn_rate,
    },
    Fragment {
        name: "ccusage_session",
        enabled: |c| c.ccusage_integration && c.has(Feature::Session),
        render: render_ccusage_session,
    },
    Fragment {
        name: "session_color",
        enabled: |c| c.has(Feature::Session),
        render: render_session_color,
    },
];

/// Joins the collected segments and prints the line.
pub const FOOTER: Fragment = Fragment {
    name: "render",
    enabled: always,
    render: render_footer,
};

fn always(_: &StatuslineConfig) -> bool {
    true
}

/// Display fragment for a feature.
///
/// Burn rate has none: its figure is shown inside the tokens segment.
pub fn segment_fragment(feature: Feature) -> Option<Fragment> {
    let (name, render): (&'static str, fn(&RenderContext<'_>) -> String) = match feature {
        Feature::Directory => ("segment_directory", render_directory_segment),
        Feature::Git => ("segment_git", render_git_segment),
        Feature::Model => ("segment_model", render_model_segment),
        Feature::Context => ("segment_context", render_context_segment),
        Feature::Usage => ("segment_usage", render_usage_segment),
        Feature::Session => ("segment_session", render_session_segment),
        Feature::Tokens => ("segment_tokens", render_tokens_segment),
        Feature::BurnRate => return None,
    };
    Some(Fragment {
        name,
        enabled: always,
        render,
    })
}

/// Composer for bash scripts.
#[derive(Debug, Clone, Default)]
pub struct BashComposer {
    created: Option<String>,
}

impl BashComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the header with a creation time.
    ///
    /// Without a stamp the output depends only on the configuration.
    pub fn with_created(mut self, created: impl Into<String>) -> Self {
        self.created = Some(created.into());
        self
    }

    /// Fragments that will be emitted for `config`, in order.
    pub fn fragments(&self, config: &StatuslineConfig) -> Vec<Fragment> {
        let mut fragments: Vec<Fragment> = PRELUDE
            .iter()
            .filter(|f| (f.enabled)(config))
            .copied()
            .collect();
        fragments.extend(
            config
                .display_order()
                .into_iter()
                .filter_map(segment_fragment),
        );
        fragments.push(FOOTER);
        fragments
    }

    /// Names of the fragments that will be emitted for `config`.
    pub fn fragment_names(&self, config: &StatuslineConfig) -> Vec<&'static str> {
        self.fragments(config).iter().map(|f| f.name).collect()
    }

    /// Render a single named fragment, whether or not `config` enables it.
    pub fn fragment_source(&self, name: &str, config: &StatuslineConfig) -> Option<String> {
        let ctx = RenderContext::new(config, self.created.as_deref());
        PRELUDE
            .iter()
            .copied()
            .chain(Feature::ALL.into_iter().filter_map(segment_fragment))
            .chain(std::iter::once(FOOTER))
            .find(|f| f.name == name)
            .map(|f| (f.render)(&ctx))
    }
}

impl ScriptComposer for BashComposer {
    fn runtime(&self) -> Runtime {
        Runtime::Bash
    }

    fn compose(&self, config: &StatuslineConfig) -> String {
        let ctx = RenderContext::new(config, self.created.as_deref());
        let mut script = String::new();
        for fragment in self.fragments(config) {
            script.push_str(&(fragment.render)(&ctx));
            script.push('\n');
        }
        script
    }
}

/// Single-quote `value` for the shell.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Emit `segments+=(...)` for a label, a color function and a printf body.
fn push_segment(label: &str, color_fn: &str, format: &str, args: &str) -> String {
    format!(
        r#"segments+=("$(printf '%s %s{format}%s' {label} "$({color_fn})" {args} "$(rst)")")"#,
        label = shell_quote(label),
    )
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

fn render_header(ctx: &RenderContext<'_>) -> String {
    let created = ctx
        .created
        .map(|ts| format!(" - Created: {ts}"))
        .unwrap_or_default();
    format!(
        "#!/usr/bin/env bash\n\
         # Generated by cc-statusline v{version}\n\
         # Custom Claude Code statusline{created}\n\
         # Theme: {theme} | Colors: {colors} | Runtime: bash\n",
        version = env!("CARGO_PKG_VERSION"),
        theme = ctx.config.theme,
        colors = ctx.config.colors,
    )
}

fn render_input(_: &RenderContext<'_>) -> String {
    r#"input=$(cat)

# ---- check jq availability ----
HAS_JQ=0
if command -v jq >/dev/null 2>&1; then
  HAS_JQ=1
fi

segments=()
"#
    .to_string()
}

fn render_logging(_: &RenderContext<'_>) -> String {
    r#"# ---- logging ----
SCRIPT_DIR="$(cd "$(dirname "${BASH_SOURCE[0]}")" && pwd)"
LOG_FILE="${SCRIPT_DIR}/statusline.log"
TIMESTAMP=$(date '+%Y-%m-%d %H:%M:%S')
{
  echo "[$TIMESTAMP] Status line triggered"
  echo "[$TIMESTAMP] Input:"
  if [ "$HAS_JQ" -eq 1 ]; then
    echo "$input" | jq . 2>/dev/null || echo "$input"
  else
    echo "$input"
  fi
  echo "---"
} >> "$LOG_FILE" 2>/dev/null
"#
    .to_string()
}

fn render_colors(ctx: &RenderContext<'_>) -> String {
    if !ctx.config.colors {
        return r#"# ---- color helpers (disabled) ----
use_color=0
rst() { :; }
dir_color() { :; }
git_color() { :; }
model_color() { :; }
usage_color() { :; }
cost_color() { :; }
"#
        .to_string();
    }

    r#"# ---- color helpers ----
use_color=1
[ -n "$NO_COLOR" ] && use_color=0
rst() { if [ "$use_color" -eq 1 ]; then printf '\033[0m'; fi; }
dir_color() { if [ "$use_color" -eq 1 ]; then printf '\033[38;5;117m'; fi; }    # sky blue
git_color() { if [ "$use_color" -eq 1 ]; then printf '\033[38;5;150m'; fi; }    # soft green
model_color() { if [ "$use_color" -eq 1 ]; then printf '\033[38;5;147m'; fi; }  # light purple
usage_color() { if [ "$use_color" -eq 1 ]; then printf '\033[38;5;111m'; fi; }  # deep sky blue
cost_color() { if [ "$use_color" -eq 1 ]; then printf '\033[38;5;226m'; fi; }   # bright yellow
"#
    .to_string()
}

fn render_time_helpers(_: &RenderContext<'_>) -> String {
    r#"# ---- time helpers ----
to_epoch() {
  local ts="$1" bsd_ts
  # BSD date (macOS)
  bsd_ts="${ts%%.*}"
  bsd_ts="${bsd_ts%Z}"
  date -u -j -f "%Y-%m-%dT%H:%M:%S" "$bsd_ts" +%s 2>/dev/null && return
  # GNU date
  if command -v gdate >/dev/null 2>&1; then gdate -d "$ts" +%s 2>/dev/null && return; fi
  date -d "$ts" +%s 2>/dev/null && return
  # interpreter fallback
  python3 - "$ts" <<'PY' 2>/dev/null
import sys, datetime
s = sys.argv[1].replace('Z', '+00:00')
print(int(datetime.datetime.fromisoformat(s).timestamp()))
PY
}

fmt_time_hm() {
  local epoch="$1"
  # GNU date reads -r as a reference file, so probe for -d @epoch first.
  if date -d @0 +%s >/dev/null 2>&1; then date -d "@$epoch" +"%H:%M"; else date -r "$epoch" +"%H:%M"; fi
}
"#
    .to_string()
}

fn render_progress_bar(_: &RenderContext<'_>) -> String {
    format!(
        r#"# ---- progress bar ----
progress_bar() {{
  local pct="${{1:-0}}" width="${{2:-{BAR_WIDTH}}}" bar="" i
  if [[ ! "$pct" =~ ^-?[0-9]+$ ]] || [[ "$pct" == -* ]]; then pct=0; fi
  pct=$(( 10#$pct ))
  (( pct > 100 )) && pct=100
  local filled=$(( pct * width / 100 ))
  local empty=$(( width - filled ))
  for (( i = 0; i < filled; i++ )); do bar+="{FILL_GLYPH}"; done
  for (( i = 0; i < empty; i++ )); do bar+="{EMPTY_GLYPH}"; done
  printf '%s' "$bar"
}}
"#
    )
}

fn render_format_number(_: &RenderContext<'_>) -> String {
    r#"# ---- number formatting ----
format_number() {
  local num="$1" out=""
  if [[ "$num" =~ ^[0-9]+$ ]] && [ "$num" -gt 999 ]; then
    while [ "${#num}" -gt 3 ]; do
      out=",${num: -3}${out}"
      num="${num:0:${#num}-3}"
    done
    printf '%s%s' "$num" "$out"
  else
    printf '%s' "$num"
  fi
}
"#
    .to_string()
}

fn render_basics(_: &RenderContext<'_>) -> String {
    r#"# ---- basics ----
if [ "$HAS_JQ" -eq 1 ]; then
  current_dir=$(echo "$input" | jq -r '.workspace.current_dir // .cwd // "unknown"' 2>/dev/null | sed "s|^$HOME|~|")
  model_name=$(echo "$input" | jq -r '.model.display_name // "Claude"' 2>/dev/null)
  session_id=$(echo "$input" | jq -r '.session_id // ""' 2>/dev/null)
  transcript_path=$(echo "$input" | jq -r '.transcript_path // ""' 2>/dev/null)
else
  current_dir=$(echo "$input" | grep -o '"current_dir"[[:space:]]*:[[:space:]]*"[^"]*"' | head -n1 | sed 's/.*:[[:space:]]*"\([^"]*\)"/\1/' | sed "s|^$HOME|~|")
  [ -z "$current_dir" ] && current_dir="unknown"
  model_name=$(echo "$input" | grep -o '"display_name"[[:space:]]*:[[:space:]]*"[^"]*"' | head -n1 | sed 's/.*:[[:space:]]*"\([^"]*\)"/\1/')
  [ -z "$model_name" ] && model_name="Claude"
  session_id=$(echo "$input" | grep -o '"session_id"[[:space:]]*:[[:space:]]*"[^"]*"' | head -n1 | sed 's/.*:[[:space:]]*"\([^"]*\)"/\1/')
  transcript_path=""
fi
"#
    .to_string()
}

fn render_git(_: &RenderContext<'_>) -> String {
    r#"# ---- git ----
git_branch=""
if command -v git >/dev/null 2>&1 && git rev-parse --git-dir >/dev/null 2>&1; then
  git_branch=$(git branch --show-current 2>/dev/null)
  [ -z "$git_branch" ] && git_branch=$(git rev-parse --short HEAD 2>/dev/null)
fi
"#
    .to_string()
}

fn render_context(_: &RenderContext<'_>) -> String {
    r#"# ---- context window ----
context_pct=""; context_remaining_pct=""
context_color() {
  local c='1;37'
  if [ -n "$context_remaining_pct" ]; then
    if   (( context_remaining_pct <= 20 )); then c='38;5;203'   # coral red
    elif (( context_remaining_pct <= 40 )); then c='38;5;215'   # peach
    else                                         c='38;5;158'; fi  # mint green
  fi
  if [ "$use_color" -eq 1 ]; then printf '\033[%sm' "$c"; fi
}

get_max_context() {
  case "$1" in
    *"Claude 3 Haiku"*|*"claude 3 haiku"*) echo "100000" ;;
    *) echo "200000" ;;
  esac
}

if [ -n "$session_id" ] && [ "$HAS_JQ" -eq 1 ]; then
  max_context=$(get_max_context "$model_name")
  session_file="$transcript_path"
  if [ -z "$session_file" ]; then
    project_dir=$(echo "$current_dir" | sed "s|^~|$HOME|" | sed 's|/|-|g' | sed 's|^-||')
    session_file="$HOME/.claude/projects/-${project_dir}/${session_id}.jsonl"
  fi
  if [ -f "$session_file" ]; then
    latest_tokens=$(tail -20 "$session_file" | jq -r 'select(.message.usage) | .message.usage | ((.input_tokens // 0) + (.cache_read_input_tokens // 0))' 2>/dev/null | tail -1)
    if [[ "$latest_tokens" =~ ^[0-9]+$ ]] && [ "$latest_tokens" -gt 0 ]; then
      context_used_pct=$(( latest_tokens * 100 / max_context ))
      context_remaining_pct=$(( 100 - context_used_pct ))
      (( context_remaining_pct < 0 )) && context_remaining_pct=0
      context_pct="${context_remaining_pct}%"
    fi
  fi
fi
"#
    .to_string()
}

fn render_cost(_: &RenderContext<'_>) -> String {
    r#"# ---- cost ----
cost_usd=""; cost_per_hour=""
if [ "$HAS_JQ" -eq 1 ]; then
  cost_usd=$(echo "$input" | jq -r '.cost.total_cost_usd // empty' 2>/dev/null)
  total_duration_ms=$(echo "$input" | jq -r '.cost.total_duration_ms // empty' 2>/dev/null)
else
  cost_usd=$(echo "$input" | grep -o '"total_cost_usd"[[:space:]]*:[[:space:]]*[0-9.]*' | head -n1 | sed 's/.*:[[:space:]]*\([0-9.]*\).*/\1/')
  total_duration_ms=$(echo "$input" | grep -o '"total_duration_ms"[[:space:]]*:[[:space:]]*[0-9]*' | head -n1 | sed 's/.*:[[:space:]]*\([0-9]*\).*/\1/')
fi
if [[ "$cost_usd" =~ ^[0-9.]+$ ]] && [[ "$total_duration_ms" =~ ^[0-9]+$ ]] && [ "$total_duration_ms" -gt 0 ]; then
  cost_per_hour=$(echo "$cost_usd $total_duration_ms" | awk '{printf "%.2f", $1 * 3600000 / $2}')
fi
"#
    .to_string()
}

fn render_ccusage_fetch(_: &RenderContext<'_>) -> String {
    r#"# ---- ccusage ----
active_block=""
if command -v ccusage >/dev/null 2>&1 && [ "$HAS_JQ" -eq 1 ]; then
  blocks_output=""
  if command -v timeout >/dev/null 2>&1; then
    blocks_output=$(timeout 5s ccusage blocks --json 2>/dev/null)
  elif command -v gtimeout >/dev/null 2>&1; then
    blocks_output=$(gtimeout 5s ccusage blocks --json 2>/dev/null)
  else
    blocks_output=$(ccusage blocks --json 2>/dev/null)
  fi
  if [ -n "$blocks_output" ]; then
    active_block=$(echo "$blocks_output" | jq -c '.blocks[] | select(.isActive == true)' 2>/dev/null | head -n1)
  fi
fi
"#
    .to_string()
}

fn render_ccusage_tokens(_: &RenderContext<'_>) -> String {
    r#"# ---- tokens ----
tot_tokens=""
if [ -n "$active_block" ]; then
  tot_tokens=$(echo "$active_block" | jq -r '.totalTokens // empty' 2>/dev/null)
fi
"#
    .to_string()
}

fn render_ccusage_burn_rate(_: &RenderContext<'_>) -> String {
    r#"# ---- burn rate ----
tpm=""
if [ -n "$active_block" ]; then
  tpm=$(echo "$active_block" | jq -r '.burnRate.tokensPerMinute // empty' 2>/dev/null)
fi
"#
    .to_string()
}

fn render_ccusage_session(ctx: &RenderContext<'_>) -> String {
    let session_txt = if ctx.layout.compact {
        r#"session_txt="$(printf '%dh %dm' "$rem_h" "$rem_m")""#
    } else {
        r#"session_txt="$(printf '%dh %dm until reset at %s (%d%%)' "$rem_h" "$rem_m" "$end_hm" "$session_pct")""#
    };
    let session_bar = if ctx.layout.progress_bars {
        format!(r#"      session_bar=$(progress_bar "$session_pct" {BAR_WIDTH})"#)
    } else {
        String::from("      session_bar=\"\"")
    };

    format!(
        r#"# ---- session window ----
session_txt=""; session_pct=0; session_bar=""
if [ -n "$active_block" ]; then
  reset_time_str=$(echo "$active_block" | jq -r '.usageLimitResetTime // .endTime // empty' 2>/dev/null)
  start_time_str=$(echo "$active_block" | jq -r '.startTime // empty' 2>/dev/null)
  if [ -n "$reset_time_str" ] && [ -n "$start_time_str" ]; then
    start_sec=$(to_epoch "$start_time_str"); end_sec=$(to_epoch "$reset_time_str"); now_sec=$(date +%s)
    if [[ "$start_sec" =~ ^[0-9]+$ ]] && [[ "$end_sec" =~ ^[0-9]+$ ]]; then
      total=$(( end_sec - start_sec )); (( total < 1 )) && total=1
      elapsed=$(( now_sec - start_sec )); (( elapsed < 0 )) && elapsed=0; (( elapsed > total )) && elapsed=$total
      session_pct=$(( elapsed * 100 / total ))
      remaining=$(( end_sec - now_sec )); (( remaining < 0 )) && remaining=0
      rem_h=$(( remaining / 3600 )); rem_m=$(( (remaining % 3600) / 60 ))
      end_hm=$(fmt_time_hm "$end_sec")
      {session_txt}
{session_bar}
    fi
  fi
fi
"#
    )
}

fn render_session_color(ctx: &RenderContext<'_>) -> String {
    if !ctx.config.colors {
        return "session_color() { :; }\n".to_string();
    }

    format!(
        r#"session_color() {{
  local rem_pct=$(( 100 - session_pct )) sclr
  if   (( rem_pct <= {critical} )); then sclr='{critical_code}'   # critical
  elif (( rem_pct <= {warning} )); then sclr='{warning_code}'   # warning
  else                          sclr='{good_code}'; fi  # good
  if [ "$use_color" -eq 1 ]; then printf '\033[%sm' "$sclr"; fi
}}
"#,
        critical = SESSION_CRITICAL_PCT,
        warning = SESSION_WARNING_PCT,
        critical_code = SessionBand::Critical.ansi_code(),
        warning_code = SessionBand::Warning.ansi_code(),
        good_code = SessionBand::Good.ansi_code(),
    )
}

// ---------------------------------------------------------------------------
// Display segments
// ---------------------------------------------------------------------------

fn render_directory_segment(ctx: &RenderContext<'_>) -> String {
    format!(
        "# segment: directory\nif [ -n \"$current_dir\" ]; then\n  {}\nfi\n",
        push_segment(ctx.labels.directory, "dir_color", "%s", r#""$current_dir""#)
    )
}

fn render_git_segment(ctx: &RenderContext<'_>) -> String {
    format!(
        "# segment: git\nif [ -n \"$git_branch\" ]; then\n  {}\nfi\n",
        push_segment(ctx.labels.git, "git_color", "%s", r#""$git_branch""#)
    )
}

fn render_model_segment(ctx: &RenderContext<'_>) -> String {
    format!(
        "# segment: model\nif [ -n \"$model_name\" ]; then\n  {}\nfi\n",
        push_segment(ctx.labels.model, "model_color", "%s", r#""$model_name""#)
    )
}

fn render_context_segment(ctx: &RenderContext<'_>) -> String {
    let text = if ctx.layout.compact {
        "%s"
    } else {
        "Context Remaining: %s"
    };
    let body = if ctx.layout.progress_bars {
        format!(
            "  context_bar=$(progress_bar \"$context_remaining_pct\" {BAR_WIDTH})\n  {}",
            push_segment(
                ctx.labels.context,
                "context_color",
                &format!("{text} [%s]"),
                r#""$context_pct" "$context_bar""#,
            )
        )
    } else {
        format!(
            "  {}",
            push_segment(ctx.labels.context, "context_color", text, r#""$context_pct""#)
        )
    };
    format!("# segment: context\nif [ -n \"$context_pct\" ]; then\n{body}\nfi\n")
}

fn render_usage_segment(ctx: &RenderContext<'_>) -> String {
    let with_rate = if ctx.layout.compact {
        push_segment(ctx.labels.cost, "cost_color", "$%.2f", r#""$cost_usd""#)
    } else {
        push_segment(
            ctx.labels.cost,
            "cost_color",
            "$%.2f ($%.2f/h)",
            r#""$cost_usd" "$cost_per_hour""#,
        )
    };
    let without_rate = push_segment(ctx.labels.cost, "cost_color", "$%.2f", r#""$cost_usd""#);

    format!(
        r#"# segment: usage
if [[ "$cost_usd" =~ ^[0-9.]+$ ]]; then
  if [[ "$cost_per_hour" =~ ^[0-9.]+$ ]]; then
    {with_rate}
  else
    {without_rate}
  fi
fi
"#
    )
}

fn render_session_segment(ctx: &RenderContext<'_>) -> String {
    let with_bar = push_segment(
        ctx.labels.session,
        "session_color",
        "%s [%s]",
        r#""$session_txt" "$session_bar""#,
    );
    let without_bar = push_segment(ctx.labels.session, "session_color", "%s", r#""$session_txt""#);

    format!(
        r#"# segment: session
if [ -n "$session_txt" ]; then
  if [ -n "$session_bar" ]; then
    {with_bar}
  else
    {without_bar}
  fi
fi
"#
    )
}

fn render_tokens_segment(ctx: &RenderContext<'_>) -> String {
    let with_tpm = push_segment(
        ctx.labels.tokens,
        "usage_color",
        "%s tokens (%s tpm)",
        r#""$formatted_tokens" "$formatted_tpm""#,
    );
    let without_tpm = push_segment(
        ctx.labels.tokens,
        "usage_color",
        "%s tokens",
        r#""$formatted_tokens""#,
    );

    format!(
        r#"# segment: tokens
if [[ "$tot_tokens" =~ ^[0-9]+$ ]]; then
  formatted_tokens=$(format_number "$tot_tokens")
  if [[ "$tpm" =~ ^[0-9.]+$ ]]; then
    formatted_tpm=$(format_number "$(printf '%.0f' "$tpm")")
    {with_tpm}
  else
    {without_tpm}
  fi
fi
"#
    )
}

fn render_footer(ctx: &RenderContext<'_>) -> String {
    format!(
        r#"# ---- render ----
line=""
for segment in "${{segments[@]}}"; do
  if [ -z "$line" ]; then line="$segment"; else line="${{line}}{sep}${{segment}}"; fi
done
printf '%s\n' "$line""#,
        sep = ctx.layout.separator,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::segments::{format_thousands, progress_bar};
    use statusline_core::IconStyle;
    use std::process::Command;

    fn bash_available() -> bool {
        Command::new("bash")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn run_bash(script: &str) -> String {
        let output = Command::new("bash")
            .arg("-c")
            .arg(script)
            .env_remove("NO_COLOR")
            .output()
            .expect("bash runs");
        String::from_utf8(output.stdout).expect("utf-8 output")
    }

    fn base() -> StatuslineConfig {
        StatuslineConfig::default()
            .with_features(vec![Feature::Directory])
            .with_ccusage(true)
    }

    #[test]
    fn test_compose_is_idempotent() {
        let config = StatuslineConfig::default();
        let composer = BashComposer::new();
        assert_eq!(composer.compose(&config), composer.compose(&config));
    }

    #[test]
    fn test_enabling_a_feature_never_removes_fragments() {
        let composer = BashComposer::new();

        for baseline_features in [vec![Feature::Directory], vec![Feature::Git, Feature::Usage]] {
            let baseline = base().with_features(baseline_features.clone());
            let baseline_fragments = composer.fragments(&baseline);

            for extra in Feature::ALL {
                let mut features = baseline_features.clone();
                features.push(extra);
                let extended = base().with_features(features);
                let script = composer.compose(&extended);
                let names = composer.fragment_names(&extended);
                let ctx = RenderContext::new(&extended, None);

                for fragment in &baseline_fragments {
                    assert!(names.contains(&fragment.name), "{} dropped by {extra}", fragment.name);
                    assert!(
                        script.contains(&(fragment.render)(&ctx)),
                        "{} text changed by {extra}",
                        fragment.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_segments_follow_declared_order() {
        let config = base().with_features(vec![Feature::Model, Feature::Git, Feature::Directory]);
        let script = BashComposer::new().compose(&config);

        let model = script.find("# segment: model").unwrap();
        let git = script.find("# segment: git").unwrap();
        let dir = script.find("# segment: directory").unwrap();
        assert!(model < git && git < dir);
    }

    #[test]
    fn test_duplicate_features_render_once() {
        let config = base().with_features(vec![Feature::Git, Feature::Git]);
        let script = BashComposer::new().compose(&config);
        assert_eq!(script.matches("# segment: git").count(), 1);
    }

    #[test]
    fn test_burn_rate_requires_tokens() {
        let composer = BashComposer::new();

        let alone = base().with_features(vec![Feature::BurnRate]);
        assert!(!composer.fragment_names(&alone).contains(&"ccusage_burn_rate"));

        let both = base().with_features(vec![Feature::Tokens, Feature::BurnRate]);
        let names = composer.fragment_names(&both);
        assert!(names.contains(&"ccusage_burn_rate"));
        assert!(names.contains(&"ccusage_tokens"));
        assert!(!names.contains(&"segment_burnrate"));
    }

    #[test]
    fn test_ccusage_fragments_follow_integration_flag() {
        let composer = BashComposer::new();
        let config = base().with_features(vec![Feature::Session, Feature::Tokens]);

        let on = composer.fragment_names(&config);
        assert!(on.contains(&"ccusage_fetch"));
        assert!(on.contains(&"ccusage_session"));

        let off = composer.fragment_names(&config.clone().with_ccusage(false));
        assert!(!off.contains(&"ccusage_fetch"));
        assert!(!off.contains(&"ccusage_session"));
        assert!(off.contains(&"segment_session"));
    }

    #[test]
    fn test_colors_flag_selects_helpers() {
        let composer = BashComposer::new();
        let colored = composer.compose(&base().with_colors(true));
        assert!(colored.contains(r"printf '\033[38;5;117m'"));

        let plain = composer.compose(&base().with_colors(false));
        assert!(plain.contains("dir_color() { :; }"));
        assert!(!plain.contains(r"\033[38;5;117m"));
    }

    #[test]
    fn test_to_epoch_tries_bsd_then_gnu_then_python() {
        let source = BashComposer::new()
            .fragment_source("time_helpers", &base())
            .unwrap();
        let bsd = source.find("date -u -j -f").unwrap();
        let gnu = source.find("date -d \"$ts\"").unwrap();
        let python = source.find("python3 -").unwrap();
        assert!(bsd < gnu && gnu < python);
    }

    #[test]
    fn test_fmt_time_hm_ignores_file_named_zero() {
        if !bash_available() {
            return;
        }
        let source = BashComposer::new()
            .fragment_source("time_helpers", &base())
            .unwrap();
        let cwd = tempfile::TempDir::new().unwrap();
        std::fs::write(cwd.path().join("0"), "").unwrap();

        let output = Command::new("bash")
            .arg("-c")
            .arg(format!("{source}\nfmt_time_hm 3600"))
            .current_dir(cwd.path())
            .env("TZ", "UTC")
            .output()
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "01:00");
    }

    #[test]
    fn test_labels_follow_icon_style() {
        let composer = BashComposer::new();

        let ascii = base().with_icon_style(Some(IconStyle::Ascii));
        assert!(composer.compose(&ascii).contains("'[DIR]'"));

        let text = base().with_icon_style(None);
        assert!(composer.compose(&text).contains("'dir:'"));
    }

    #[test]
    fn test_theme_controls_separator_and_bars() {
        let composer = BashComposer::new();
        let features = vec![Feature::Context, Feature::Session];

        let compact = base().with_features(features.clone()).with_theme("compact");
        assert!(composer.compose(&compact).contains(r#"line="${line} ${segment}""#));

        let minimal = base().with_features(features.clone()).with_theme("minimal");
        let script = composer.compose(&minimal);
        assert!(script.contains(r#"line="${line}  ${segment}""#));
        assert!(!script.contains("context_bar=$(progress_bar"));
        assert!(!script.contains("session_bar=$(progress_bar"));

        let detailed = base().with_features(features).with_theme("detailed");
        assert!(composer.compose(&detailed).contains("session_bar=$(progress_bar"));
    }

    #[test]
    fn test_unknown_theme_renders_as_detailed() {
        let composer = BashComposer::new();
        let odd = composer.compose(&base().with_theme("neon"));
        let detailed = composer.compose(&base().with_theme("detailed"));
        assert_eq!(
            odd.replace("Theme: neon", "Theme: detailed"),
            detailed
        );
    }

    #[test]
    fn test_created_stamp_only_in_header() {
        let stamped = BashComposer::new()
            .with_created("2025-08-20 10:00")
            .compose(&base());
        assert!(stamped.contains("# Custom Claude Code statusline - Created: 2025-08-20 10:00"));
        assert!(BashComposer::new().compose(&base()).contains("# Custom Claude Code statusline\n"));
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("[DIR]"), "'[DIR]'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_emitted_progress_bar_matches_reference() {
        if !bash_available() {
            return;
        }
        let helper = BashComposer::new()
            .fragment_source("progress_bar", &base())
            .unwrap();

        for pct in [-5, 0, 7, 50, 99, 100, 140] {
            let out = run_bash(&format!("{helper}\nprogress_bar {pct} 10"));
            assert_eq!(out, progress_bar(pct, 10), "pct={pct}");
        }
        assert_eq!(run_bash(&format!("{helper}\nprogress_bar abc 10")), progress_bar(0, 10));
        assert_eq!(run_bash(&format!("{helper}\nprogress_bar 08 10")), progress_bar(8, 10));
    }

    #[test]
    fn test_emitted_format_number_matches_reference() {
        if !bash_available() {
            return;
        }
        let helper = BashComposer::new()
            .fragment_source("format_number", &base())
            .unwrap();

        for value in ["0", "999", "1000", "65432", "1234567", "abc", "12.5"] {
            let out = run_bash(&format!("{helper}\nformat_number '{value}'"));
            assert_eq!(out, format_thousands(value), "value={value}");
        }
    }

    #[test]
    fn test_emitted_session_color_bands() {
        if !bash_available() {
            return;
        }
        let config = base().with_colors(true);
        let composer = BashComposer::new();
        let colors = composer.fragment_source("colors", &config).unwrap();
        let session_color = composer.fragment_source("session_color", &config).unwrap();

        for remaining in [0, 10, 11, 25, 26, 100] {
            let script = format!(
                "{colors}\n{session_color}\nsession_pct=$(( 100 - {remaining} ))\nsession_color"
            );
            let expected = format!(
                "\x1b[{}m",
                SessionBand::from_remaining_pct(remaining).ansi_code()
            );
            assert_eq!(run_bash(&script), expected, "remaining={remaining}");
        }
    }

    #[test]
    fn test_full_script_runs_without_jq_data() {
        if !bash_available() {
            return;
        }
        let config = StatuslineConfig::default()
            .with_features(vec![Feature::Model, Feature::Usage])
            .with_icon_style(None)
            .with_colors(false)
            .with_ccusage(false);
        let script = BashComposer::new().compose(&config);

        let output = Command::new("bash")
            .arg("-c")
            .arg(&script)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .spawn()
            .and_then(|mut child| {
                use std::io::Write;
                if let Some(mut stdin) = child.stdin.take() {
                    stdin.write_all(
                        br#"{"model":{"display_name":"Opus 4.1"},"cost":{"total_cost_usd":3.42,"total_duration_ms":3600000}}"#,
                    )?;
                }
                child.wait_with_output()
            })
            .expect("script runs");

        let line = String::from_utf8(output.stdout).unwrap();
        assert_eq!(line, "model: Opus 4.1  cost: $3.42 ($3.42/h)\n");
    }
}
