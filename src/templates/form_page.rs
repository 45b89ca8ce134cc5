use crate::schema::{FieldKind, FormSchema};

const STYLE: &str = r#"
        *, *::before, *::after { margin: 0; padding: 0; box-sizing: border-box; }

        :root {
            --bg: #0b1220;
            --card: #111a2e;
            --border: #1e293b;
            --text-primary: #e2e8f0;
            --text-secondary: #94a3b8;
            --accent: #38bdf8;
            --error: #b91c1c;
            --track: #1e293b;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Inter', system-ui, sans-serif;
            background: var(--bg); color: var(--text-primary); min-height: 100vh;
            -webkit-font-smoothing: antialiased;
        }

        .page { max-width: 720px; margin: 0 auto; padding: 3rem 1.25rem 4rem; }

        h1 { font-size: 1.5rem; margin-bottom: 0.25rem; }
        .subtitle { color: var(--text-secondary); margin-bottom: 2rem; }

        .card {
            background: var(--card); border: 1px solid var(--border);
            border-radius: 12px; padding: 1.5rem; margin-bottom: 1.5rem;
        }

        .field-grid {
            display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr));
            gap: 1rem 1.25rem; margin-bottom: 1.25rem;
        }
        .field label {
            display: block; font-size: 0.8rem; color: var(--text-secondary);
            margin-bottom: 0.3rem;
        }
        .field input {
            width: 100%; padding: 0.5rem 0.65rem; border-radius: 8px;
            border: 1px solid var(--border); background: var(--bg);
            color: var(--text-primary); font-size: 0.9rem;
        }
        .field input:focus { outline: none; border-color: var(--accent); }

        button[type=submit] {
            padding: 0.6rem 1.5rem; border: none; border-radius: 8px;
            background: var(--accent); color: #06283d; font-weight: 700;
            font-size: 0.95rem; cursor: pointer;
        }
        button[type=submit]:disabled { opacity: 0.6; cursor: wait; }

        .hidden { display: none; }

        .status.present { color: #ff5a6e; font-weight: 700; }
        .status.absent { color: #34d399; font-weight: 700; }

        .error { color: var(--error); }

        .result-layout { display: flex; gap: 2rem; align-items: center; flex-wrap: wrap; }

        .badge { position: relative; width: 160px; height: 160px; flex: none; }
        .badge svg { width: 100%; height: 100%; }
        .badge-label {
            position: absolute; left: 0; right: 0; bottom: 8px; text-align: center;
            font-weight: 700; font-size: 0.75rem; color: #0f172a;
        }
        @keyframes pulse {
            0% { transform: scale(1); }
            50% { transform: scale(1.06); }
            100% { transform: scale(1); }
        }
        .pulse { animation: pulse 1.6s ease-in-out infinite; transform-origin: center; }

        .gauge-wrap { flex: 1; min-width: 220px; }
        .gauge {
            height: 14px; border-radius: 9999px; background: var(--track);
            overflow: hidden; margin-bottom: 0.5rem;
        }
        .gauge-fill {
            height: 100%; width: 0%; border-radius: 9999px;
            transition: width 900ms cubic-bezier(0.2, 0.8, 0.2, 1);
        }
        .conf-text { color: var(--text-secondary); font-size: 0.85rem; }
"#;

const SCRIPT: &str = r#"
const form = document.getElementById('predictForm');
const resultSection = document.getElementById('result');
const resultContent = document.getElementById('resultContent');
const submitBtn = document.getElementById('submitBtn');
const badge = document.getElementById('resultBadge');
const gauge = document.getElementById('gaugeFill');
const confText = document.getElementById('confText');
const errorBox = document.getElementById('errorBox');
const errorText = document.getElementById('errorText');

function showError(msg) {
  resultSection.classList.remove('hidden');
  resultContent.innerHTML = '';
  errorBox.classList.remove('hidden');
  errorText.textContent = msg;
}

form.addEventListener('submit', async (e) => {
  e.preventDefault();
  submitBtn.disabled = true;
  submitBtn.textContent = 'Predicting...';
  resultSection.classList.add('hidden');
  errorBox.classList.add('hidden');

  try {
    const fields = {};
    for (const [k, v] of new FormData(form).entries()) fields[k] = v;

    const resp = await fetch('/predict', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ fields })
    });

    const data = await resp.json();
    if (!resp.ok) {
      showError(data.error || ('Request failed: ' + resp.status));
      return;
    }

    resultSection.classList.remove('hidden');
    resultContent.innerHTML = data.summary_html;
    badge.innerHTML = data.badge_html;
    confText.textContent = data.gauge.caption;
    gauge.style.background = data.gauge.gradient;
    gauge.style.width = '0%';
    // Next frame, so the width transition actually renders.
    requestAnimationFrame(() => { gauge.style.width = data.gauge.width + '%'; });
  } catch (err) {
    showError(err.message);
  } finally {
    submitBtn.disabled = false;
    submitBtn.textContent = 'Predict';
  }
});
"#;

pub fn render(schema: &FormSchema) -> String {
    let mut inputs = String::new();
    for field in schema.fields() {
        let type_attrs = match field.kind {
            FieldKind::Int => r#"type="number" step="1""#.to_string(),
            FieldKind::Float => r#"type="number" step="any""#.to_string(),
            FieldKind::Text => r#"type="text""#.to_string(),
        };
        let mut range_attrs = String::new();
        if let Some(min) = field.min {
            range_attrs.push_str(&format!(r#" min="{min}""#));
        }
        if let Some(max) = field.max {
            range_attrs.push_str(&format!(r#" max="{max}""#));
        }
        inputs.push_str(&format!(
            r#"                <div class="field">
                    <label for="{name}">{label}</label>
                    <input id="{name}" name="{name}" {type_attrs}{range_attrs} required>
                </div>
"#,
            name = field.name,
            label = field.label,
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} — cardiogauge</title>
    <style>{style}</style>
</head>
<body>
    <div class="page">
        <h1>cardiogauge</h1>
        <p class="subtitle">{description}</p>

        <form id="predictForm" class="card">
            <div class="field-grid">
{inputs}            </div>
            <button id="submitBtn" type="submit">Predict</button>
        </form>

        <section id="result" class="card hidden">
            <p id="errorBox" class="error hidden"><strong>Error:</strong> <span id="errorText"></span></p>
            <div id="resultContent"></div>
            <div class="result-layout">
                <div id="resultBadge" class="badge"></div>
                <div class="gauge-wrap">
                    <div class="gauge"><div id="gaugeFill" class="gauge-fill"></div></div>
                    <div id="confText" class="conf-text"></div>
                </div>
            </div>
        </section>
    </div>
    <script>{script}</script>
</body>
</html>"#,
        title = schema.name,
        description = schema.description,
        style = STYLE,
        script = SCRIPT,
    )
}
