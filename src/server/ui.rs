//! UI route handler — a single embedded page, no build step and no
//! client-side framework. All rendering is plain DOM code driven by the
//! JSON returned from `/api/annotate`.

use axum::response::Html;

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>RadGraph Annotator</title>
  <style>
    *, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: system-ui, -apple-system, sans-serif;
      background: #0f0f0f; color: #e0e0e0;
      max-width: 960px; margin: 0 auto; padding: 2rem 1rem;
    }
    h1 { font-size: 1.5rem; margin-bottom: 0.25rem; }
    p.sub { font-size: 0.9rem; color: #888; margin-bottom: 1.5rem; }
    .warning {
      font-size: 0.85rem; color: #e0b060;
      border: 1px solid #5a4a2a; border-radius: 8px;
      background: #1a1710; padding: 0.6rem 0.9rem; margin-bottom: 1.5rem;
    }
    .settings {
      display: flex; gap: 1.5rem; align-items: center; flex-wrap: wrap;
      margin-bottom: 1rem; font-size: 0.9rem;
    }
    .settings label { color: #aaa; }
    input[type="text"] {
      background: #1a1a1a; color: #e0e0e0;
      border: 1px solid #333; border-radius: 8px;
      padding: 0.4rem 0.6rem; min-width: 16rem;
    }
    textarea {
      width: 100%; height: 10rem;
      background: #1a1a1a; color: #e0e0e0;
      border: 1px solid #333; border-radius: 8px;
      padding: 0.75rem; font-size: 0.95rem; line-height: 1.4;
      margin-bottom: 1rem; resize: vertical;
    }
    button {
      padding: 0.5rem 1.5rem; border: none; border-radius: 8px;
      background: #2a2a3a; color: #c0c0e0; font-size: 0.95rem;
      cursor: pointer; transition: background 0.15s;
    }
    button:hover { background: #3a3a5a; }
    button.small { padding: 0.3rem 0.9rem; font-size: 0.85rem; }
    #status {
      margin: 1rem 0; padding: 0.6rem 0.9rem; border-radius: 8px;
      background: #1a1a1a; font-size: 0.9rem; color: #aaa; display: none;
    }
    #status.error { color: #e08080; border: 1px solid #5a2a2a; }
    section { margin-top: 1.5rem; display: none; }
    section h2 { font-size: 1.1rem; margin-bottom: 0.5rem; }
    table {
      width: 100%; border-collapse: collapse; font-size: 0.85rem;
    }
    th, td {
      text-align: left; padding: 0.4rem 0.6rem;
      border-bottom: 1px solid #2a2a2a;
    }
    th { color: #888; font-weight: 600; }
    .downloads { display: flex; gap: 0.75rem; margin-top: 0.75rem; }
    pre {
      background: #1a1a1a; border: 1px solid #333; border-radius: 8px;
      padding: 0.75rem; overflow-x: auto; font-size: 0.8rem;
      white-space: pre-wrap;
    }
    .empty { color: #666; font-size: 0.85rem; }
  </style>
</head>
<body>
  <h1>RadGraph Annotator</h1>
  <p class="sub">Enter a radiology report and press Annotate. The report is sent to the
    configured hosted model; extracted entities and relations are shown below.</p>
  <div class="warning">Do not paste real PHI unless permitted by your policies.</div>

  <div class="settings">
    <label for="model">Model id</label>
    <input type="text" id="model" placeholder="(configured default)" />
    <label><input type="checkbox" id="show-raw" checked /> Show raw JSON</label>
  </div>

  <textarea id="report">Exam: Chest radiograph. Findings: The heart size is within normal limits. There is a small right pleural effusion. A 1.2 cm rounded density in the right lower lobe may represent a small neoplasm.</textarea>
  <button id="annotate">Annotate</button>
  <div id="status"></div>

  <section id="entities-section">
    <h2>Entities</h2>
    <div id="entities"></div>
  </section>

  <section id="relations-section">
    <h2>Relations</h2>
    <div id="relations"></div>
  </section>

  <section id="raw-section">
    <h2>Raw model output</h2>
    <pre id="raw"></pre>
  </section>

  <section id="downloads-section">
    <div class="downloads">
      <button class="small" id="dl-entities">Download Entities CSV</button>
      <button class="small" id="dl-relations">Download Relations CSV</button>
      <button class="small" id="dl-json">Download Raw JSON</button>
    </div>
  </section>

  <script>
    const el = id => document.getElementById(id);
    let last = null;

    function setStatus(text, isError) {
      const s = el('status');
      s.style.display = text ? 'block' : 'none';
      s.textContent = text;
      s.className = isError ? 'error' : '';
    }

    function renderTable(container, columns, rows) {
      if (!rows.length) {
        container.innerHTML = '<p class="empty">No rows in recognized format. Inspect raw JSON.</p>';
        return;
      }
      const table = document.createElement('table');
      const head = table.insertRow();
      columns.forEach(c => {
        const th = document.createElement('th');
        th.textContent = c;
        head.appendChild(th);
      });
      rows.forEach(row => {
        const tr = table.insertRow();
        columns.forEach(c => {
          tr.insertCell().textContent = row[c] ?? '';
        });
      });
      container.replaceChildren(table);
    }

    function download(name, text, type) {
      const url = URL.createObjectURL(new Blob([text], { type }));
      const a = document.createElement('a');
      a.href = url;
      a.download = name;
      a.click();
      URL.revokeObjectURL(url);
    }

    async function annotate() {
      const report = el('report').value;
      if (!report.trim()) {
        setStatus('Please enter a report.', true);
        return;
      }
      setStatus('Running inference…', false);
      document.querySelectorAll('section').forEach(s => s.style.display = 'none');

      try {
        const res = await fetch('/api/annotate', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ report, model: el('model').value || null }),
        });
        const data = await res.json();
        if (!res.ok) {
          setStatus('Error during annotation: ' + (data.message || res.statusText), true);
          return;
        }
        last = data;
        setStatus('Annotation complete (model: ' + data.model + ').', false);

        renderTable(el('entities'), ['id', 'text', 'label', 'start', 'end'], data.entities);
        renderTable(el('relations'), ['source', 'target', 'label'], data.relations);
        el('raw').textContent = JSON.stringify(data.raw, null, 2);

        el('entities-section').style.display = 'block';
        el('relations-section').style.display = 'block';
        el('raw-section').style.display = el('show-raw').checked ? 'block' : 'none';
        el('downloads-section').style.display = 'block';
      } catch (err) {
        setStatus('Error during annotation: ' + err.message, true);
      }
    }

    el('annotate').addEventListener('click', annotate);
    el('dl-entities').addEventListener('click', () =>
      last && download('radgraph_entities.csv', last.entities_csv, 'text/csv'));
    el('dl-relations').addEventListener('click', () =>
      last && download('radgraph_relations.csv', last.relations_csv, 'text/csv'));
    el('dl-json').addEventListener('click', () =>
      last && download('radgraph_output.json', JSON.stringify(last.raw, null, 2), 'application/json'));
  </script>
</body>
</html>
"#;

/// GET / — the annotation page.
pub(super) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
