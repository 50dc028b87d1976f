use axum::{extract::State, response::Html, routing::{get, post}, Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use scanview_core::config::ConfigPreset;
use scanview_core::{views, DashboardState, RequestKind, ScannerClient, Tab};

pub struct AppContext {
    pub client: Arc<ScannerClient>,
    pub state: Arc<DashboardState>,
    pub presets: Vec<ConfigPreset>,
}

pub async fn start_dashboard(ctx: Arc<AppContext>, bind: &str) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/", get(serve_html))
        .route("/api/state", get(api_state))
        .route("/api/scan", post(api_scan))
        .route("/api/demo/attack", post(api_attack))
        .route("/api/tab", post(api_tab))
        .route("/api/configs", get(api_configs))
        .route("/api/health", get(api_health))
        .with_state(ctx);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn serve_html() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

#[derive(Deserialize)]
struct ScanRequest {
    #[serde(default = "default_config_path")]
    config_path: String,
}

fn default_config_path() -> String {
    "configs/poisoned_config.json".into()
}

#[derive(Deserialize)]
struct TabRequest {
    tab: Tab,
}

async fn api_state(State(ctx): State<Arc<AppContext>>) -> Json<serde_json::Value> {
    let snap = ctx.state.snapshot();
    let (summary_html, results_html) = match &snap.scan_report {
        Some(report) => (
            views::render_summary(&report.summary),
            views::render_scan_results(report),
        ),
        None => (String::new(), String::new()),
    };
    let attack_html = snap
        .attack_report
        .as_ref()
        .map(views::render_attack_timeline)
        .unwrap_or_default();
    Json(json!({
        "active_tab": snap.active_tab,
        "scan_loading": snap.scan_loading,
        "attack_loading": snap.attack_loading,
        "summary_html": summary_html,
        "results_html": results_html,
        "attack_html": attack_html,
    }))
}

/// The requestScan flow: begin → one service call → commit or fail. A failed
/// call leaves the previous report untouched; the JSON error reply drives the
/// page's failure notice.
async fn api_scan(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<ScanRequest>,
) -> Json<serde_json::Value> {
    let ticket = ctx.state.begin(RequestKind::Scan);
    match ctx.client.scan(&req.config_path).await {
        Ok(report) => {
            let summary_html = views::render_summary(&report.summary);
            let results_html = views::render_scan_results(&report);
            if ctx.state.commit_scan(ticket, report) {
                Json(json!({
                    "status": "success",
                    "summary_html": summary_html,
                    "results_html": results_html,
                }))
            } else {
                // A newer scan owns the view now; this response is dropped.
                Json(json!({ "status": "superseded" }))
            }
        }
        Err(e) => {
            ctx.state.fail(ticket);
            error!(config = %req.config_path, error = %e, "Scan request failed");
            Json(json!({ "status": "error", "message": e.to_string() }))
        }
    }
}

/// Same contract as `api_scan`, for the attack demo. A service reply whose
/// status is not "success" surfaces the same failure notice as a scan failure.
async fn api_attack(State(ctx): State<Arc<AppContext>>) -> Json<serde_json::Value> {
    let ticket = ctx.state.begin(RequestKind::Attack);
    match ctx.client.attack_demo().await {
        Ok(report) => {
            let attack_html = views::render_attack_timeline(&report);
            if ctx.state.commit_attack(ticket, report) {
                Json(json!({ "status": "success", "attack_html": attack_html }))
            } else {
                Json(json!({ "status": "superseded" }))
            }
        }
        Err(e) => {
            ctx.state.fail(ticket);
            error!(error = %e, "Attack demo request failed");
            Json(json!({ "status": "error", "message": e.to_string() }))
        }
    }
}

async fn api_tab(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<TabRequest>,
) -> Json<serde_json::Value> {
    ctx.state.set_active_tab(req.tab);
    Json(json!({ "active_tab": req.tab }))
}

async fn api_configs(State(ctx): State<Arc<AppContext>>) -> Json<serde_json::Value> {
    Json(json!({ "configs": ctx.presets }))
}

async fn api_health(State(ctx): State<Arc<AppContext>>) -> Json<serde_json::Value> {
    match ctx.client.health().await {
        Ok(()) => Json(json!({ "status": "healthy", "scanner": ctx.client.base_url() })),
        Err(e) => Json(json!({ "status": "unreachable", "message": e.to_string() })),
    }
}

const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>MCP ScanView — Security Scanner Dashboard</title>
<style>
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#0a0e17;--card:#111827;--border:#1e293b;--text:#e2e8f0;--dim:#64748b;
--green:#10b981;--red:#ef4444;--amber:#f59e0b;--blue:#3b82f6;--purple:#8b5cf6;--cyan:#06b6d4}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,monospace;background:var(--bg);color:var(--text);min-height:100vh}
header{background:linear-gradient(135deg,#0f172a,#1e1b4b);border-bottom:1px solid var(--border);padding:16px 24px;display:flex;align-items:center;justify-content:space-between}
header h1{font-size:20px;font-weight:700;background:linear-gradient(90deg,var(--cyan),var(--purple));-webkit-background-clip:text;-webkit-text-fill-color:transparent}
header .meta{font-size:12px;color:var(--dim)}
.tabs{display:flex;gap:8px;padding:12px 24px;border-bottom:1px solid var(--border);background:#0d1117}
.tab-btn{background:var(--card);border:1px solid var(--border);border-radius:6px;color:var(--dim);padding:8px 20px;font-size:13px;font-weight:600;cursor:pointer;text-transform:uppercase;letter-spacing:1px}
.tab-btn.active{color:var(--cyan);border-color:var(--cyan)}
main{padding:16px 24px}
.tab-pane{display:none}
.tab-pane.active{display:block}
.controls{display:flex;gap:8px;margin-bottom:16px;flex-wrap:wrap}
.trigger{background:var(--card);border:1px solid var(--border);border-radius:6px;color:var(--text);padding:10px 16px;font-size:13px;cursor:pointer;text-align:left}
.trigger:hover{border-color:var(--cyan)}
.trigger:disabled{opacity:0.4;cursor:wait}
.trigger .name{font-weight:600}
.trigger .desc{font-size:11px;color:var(--dim);margin-top:2px}
.trigger.attack{border-color:var(--red);color:var(--red);font-weight:600}
.summary-grid{display:flex;gap:16px;margin-bottom:16px}
.stat{background:var(--card);border:1px solid var(--border);border-radius:8px;padding:12px 20px;flex:1;text-align:center}
.stat .val{font-size:28px;font-weight:700}
.stat .label{font-size:11px;color:var(--dim);text-transform:uppercase;letter-spacing:1px;margin-top:4px}
.stat.sev-critical .val{color:var(--red)}
.stat.sev-high .val{color:var(--amber)}
.stat.sev-medium .val{color:var(--blue)}
.stat.sev-safe .val{color:var(--green)}
.finding-card{background:var(--card);border:1px solid var(--border);border-left:4px solid var(--dim);border-radius:6px;padding:12px 16px;margin-bottom:10px}
.finding-head{display:flex;gap:10px;align-items:center;margin-bottom:6px}
.finding-server{font-weight:600}
.finding-tool{color:var(--dim);font-size:12px}
.sev-badge{font-size:10px;font-weight:700;padding:2px 8px;border:1px solid;border-radius:3px;margin-left:auto}
.vuln-row{display:flex;gap:10px;align-items:flex-start;padding:6px 0;border-top:1px solid #1a1f2e;font-size:12px}
.vuln-dot{width:8px;height:8px;border-radius:50%;flex-shrink:0;margin-top:4px}
.vuln-desc{color:var(--text)}
.vuln-rec{color:var(--dim);margin-top:2px}
.no-vulns{color:var(--green);font-size:12px;padding:4px 0}
.timeline{margin-bottom:16px}
.timeline-step{display:flex;gap:12px;align-items:flex-start;padding:10px 0;border-bottom:1px solid #1a1f2e}
.step-num{background:var(--card);border:1px solid var(--red);color:var(--red);border-radius:50%;width:28px;height:28px;display:flex;align-items:center;justify-content:center;font-weight:700;font-size:13px;flex-shrink:0}
.step-event{font-weight:600}
.step-desc{color:var(--dim);font-size:12px;margin-top:2px}
.compare-grid{display:grid;grid-template-columns:1fr 1fr;gap:16px}
@media(max-width:900px){.compare-grid{grid-template-columns:1fr}}
.compare-panel{background:var(--card);border:1px solid var(--border);border-radius:8px;padding:14px 16px}
.compare-panel.victim{border-color:var(--blue)}
.compare-panel.reality{border-color:var(--red)}
.panel-title{font-size:11px;color:var(--dim);text-transform:uppercase;letter-spacing:1px;margin-bottom:8px}
.panel-text{font-size:13px}
.attacker-line{margin-top:8px;font-size:12px;color:var(--red)}
.attacker-email{font-weight:700}
.no-data{color:var(--dim);font-size:13px;text-align:center;padding:20px}
footer{text-align:center;padding:16px;font-size:11px;color:#334155;border-top:1px solid var(--border)}
</style>
</head>
<body>
<header>
<div><h1>MCP SCANVIEW</h1><div class="meta">MCP Security Scanner Dashboard</div></div>
<div class="meta" id="health">checking scanner...</div>
</header>
<div class="tabs">
<button class="tab-btn active" id="tab-scan" onclick="switchTab('scan')">Scan Results</button>
<button class="tab-btn" id="tab-attack" onclick="switchTab('attack')">Attack Demo</button>
</div>
<main>
<div class="tab-pane active" id="pane-scan">
<div class="controls" id="preset-buttons"></div>
<div id="scan-summary"></div>
<div id="scan-results"><div class="no-data">Run a scan to see results</div></div>
</div>
<div class="tab-pane" id="pane-attack">
<div class="controls">
<button class="trigger attack" onclick="runAttack()">&#9888; Run Attack Demonstration</button>
</div>
<div id="attack-view"><div class="no-data">Run the demo to see the attack timeline</div></div>
</div>
</main>
<footer>MCP ScanView — scans run on the external scanner service</footer>
<script>
let inFlight=false;

function setLoading(on){
  inFlight=on;
  document.querySelectorAll('.trigger').forEach(b=>b.disabled=on);
}

function switchTab(t){
  document.getElementById('tab-scan').classList.toggle('active',t==='scan');
  document.getElementById('tab-attack').classList.toggle('active',t==='attack');
  document.getElementById('pane-scan').classList.toggle('active',t==='scan');
  document.getElementById('pane-attack').classList.toggle('active',t==='attack');
  fetch('/api/tab',{method:'POST',headers:{'Content-Type':'application/json'},body:JSON.stringify({tab:t})}).catch(()=>{});
}

async function runScan(path){
  if(inFlight)return;
  setLoading(true);
  try{
    const r=await fetch('/api/scan',{method:'POST',headers:{'Content-Type':'application/json'},body:JSON.stringify({config_path:path})}).then(r=>r.json());
    if(r.status==='success'){
      document.getElementById('scan-summary').innerHTML=r.summary_html;
      document.getElementById('scan-results').innerHTML=r.results_html;
    }else if(r.status==='error'){
      alert('Scan failed: '+r.message);
    }
  }catch(e){alert('Scan failed: '+e)}
  finally{setLoading(false)}
}

async function runAttack(){
  if(inFlight)return;
  setLoading(true);
  try{
    const r=await fetch('/api/demo/attack',{method:'POST',headers:{'Content-Type':'application/json'},body:'{}'}).then(r=>r.json());
    if(r.status==='success'){
      document.getElementById('attack-view').innerHTML=r.attack_html;
    }else if(r.status==='error'){
      alert('Attack demo failed: '+r.message);
    }
  }catch(e){alert('Attack demo failed: '+e)}
  finally{setLoading(false)}
}

async function loadPresets(){
  try{
    const data=await fetch('/api/configs').then(r=>r.json());
    const box=document.getElementById('preset-buttons');
    box.innerHTML=(data.configs||[]).map(c=>`
      <button class="trigger" onclick="runScan('${c.path}')">
        <div class="name">${c.name}</div>
        <div class="desc">${c.description} — expected: ${c.expected_risk}</div>
      </button>`).join('');
  }catch(e){console.error('Preset load error',e)}
}

async function loadState(){
  try{
    const s=await fetch('/api/state').then(r=>r.json());
    if(s.results_html){
      document.getElementById('scan-summary').innerHTML=s.summary_html;
      document.getElementById('scan-results').innerHTML=s.results_html;
    }
    if(s.attack_html){document.getElementById('attack-view').innerHTML=s.attack_html;}
    switchTab(s.active_tab==='attack'?'attack':'scan');
    setLoading(s.scan_loading||s.attack_loading);
  }catch(e){console.error('State load error',e)}
}

async function checkHealth(){
  try{
    const h=await fetch('/api/health').then(r=>r.json());
    const el=document.getElementById('health');
    el.textContent=h.status==='healthy'?('scanner: '+h.scanner):'scanner unreachable';
    el.style.color=h.status==='healthy'?'var(--green)':'var(--red)';
  }catch(e){}
}

loadPresets();loadState();checkHealth();
setInterval(checkHealth,30000);
</script>
</body>
</html>"#;
