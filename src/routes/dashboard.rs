use axum::{
    http::header,
    response::{Html, IntoResponse},
};

/// Replaced with the API origin the page talks to ("" for same origin).
const API_BASE_PLACEHOLDER: &str = "__API_BASE__";

pub async fn dashboard() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "public, max-age=60")],
        Html(render_page("")),
    )
}

/// Dashboard HTML calling the API at `api_base`.
///
/// The served page uses relative URLs; a static export points it at the
/// deployed API instead.
#[must_use]
pub fn render_page(api_base: &str) -> String {
    let api_base = api_base.trim_end_matches('/');
    // Quoted into a JS string literal
    let escaped = api_base.replace('\\', "\\\\").replace('\'', "\\'");
    DASHBOARD_HTML.replace(API_BASE_PLACEHOLDER, &escaped)
}

const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="pl">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Pomiary</title>
    <style>
        :root {
            --bg: #f8fafc;
            --surface: #ffffff;
            --border: #e2e8f0;
            --text: #1e293b;
            --muted: #64748b;
            --accent: #075985;
            --error: #dc2626;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body { font-family: system-ui, -apple-system, sans-serif; background: var(--bg); color: var(--text); min-height: 100vh; }

        .container {
            max-width: 1000px;
            margin: 0 auto;
            padding: 1.5rem;
            display: flex;
            flex-direction: column;
            align-items: center;
            gap: 1rem;
        }

        header {
            display: flex;
            justify-content: space-between;
            align-items: center;
            width: 100%;
            gap: 1rem;
        }
        h1 { font-size: 1.25rem; font-weight: 600; }

        button, select {
            padding: 0.5rem 1rem;
            border: 1px solid var(--border);
            border-radius: 0.375rem;
            font-size: 0.875rem;
            background: var(--surface);
            cursor: pointer;
            transition: all 0.15s;
        }
        button:hover {
            border-color: var(--accent);
            color: var(--accent);
        }
        button:disabled {
            opacity: 0.5;
            cursor: default;
        }

        .error-banner {
            display: none;
            width: 100%;
            padding: 0.75rem 1rem;
            border: 1px solid var(--error);
            border-radius: 0.5rem;
            color: var(--error);
            background: #fef2f2;
        }
        .error-banner.visible { display: block; }

        .cards {
            display: flex;
            flex-wrap: wrap;
            justify-content: center;
            gap: 1rem;
        }
        .card {
            background: var(--surface);
            border: 1px solid var(--border);
            border-radius: 0.5rem;
            padding: 1rem;
            position: relative;
        }
        .card h2 { font-size: 1rem; font-weight: 700; margin-bottom: 1rem; }

        table { border-collapse: collapse; font-size: 0.875rem; }
        td, th {
            border: 1px solid var(--border);
            padding: 0.5rem 1rem;
            text-align: left;
            font-variant-numeric: tabular-nums;
        }
        th { color: var(--muted); font-weight: 600; }

        .loading {
            display: none;
            font-weight: 700;
            color: var(--muted);
        }
        .loading.visible { display: block; }

        .chart-controls {
            display: flex;
            gap: 0.5rem;
            flex-wrap: wrap;
            align-items: center;
        }
        .chart-image {
            max-width: 100%;
            border-radius: 0.5rem;
        }
        .chart-placeholder {
            display: flex;
            align-items: center;
            justify-content: center;
            width: 768px;
            max-width: 100%;
            height: 384px;
            color: var(--muted);
            background: var(--surface);
            border: 1px solid var(--border);
            border-radius: 0.5rem;
        }
        .hidden { display: none; }
    </style>
</head>
<body>
<div class="container">
    <header>
        <h1 id="header-text">Pomiary</h1>
        <button id="toggle-view">Przeglądaj pomiary</button>
    </header>

    <div id="error-banner" class="error-banner"></div>

    <section id="home-view">
        <div id="latest-cards" class="cards"></div>
    </section>

    <section id="explore-view" class="hidden">
        <div class="chart-controls">
            <select id="chart-sensor"></select>
            <select id="chart-metric">
                <option value="temperature">Temperatura [°C]</option>
                <option value="humidity">Wilgotność [%]</option>
            </select>
            <button id="chart-refresh">Wykres</button>
        </div>
        <div id="chart-area" class="chart-placeholder">Brak danych</div>

        <div id="measurements-loading" class="loading">Ładowanie...</div>
        <table>
            <thead>
                <tr><th>Czas</th><th>Pokój</th><th>Temp.</th><th>Wilg.</th></tr>
            </thead>
            <tbody id="measurements"></tbody>
        </table>
        <button id="load-more">Wczytaj więcej</button>
    </section>
</div>

<script>
const API_BASE = '__API_BASE__';

async function api(path, options) {
    const response = await fetch(API_BASE + path, options);
    const body = await response.json();
    if (!response.ok) {
        throw new Error(body.error || `HTTP ${response.status}`);
    }
    return body;
}

const state = {
    sensors: [],
    rooms: {},
    session: null,
    halted: false,
    view: 'home',
};

function formatTime(ts) {
    const d = new Date(ts * 1000);
    const pad = n => String(n).padStart(2, '0');
    return `${d.getFullYear()}-${pad(d.getMonth() + 1)}-${pad(d.getDate())} ` +
        `${pad(d.getHours())}:${pad(d.getMinutes())}:${pad(d.getSeconds())}`;
}

function showError(message) {
    const banner = document.getElementById('error-banner');
    banner.textContent = message;
    banner.classList.add('visible');
}

function setLoading(widget, visible) {
    const id = widget.kind === 'latest'
        ? `latest-loading-${widget.sensor}`
        : 'measurements-loading';
    const el = document.getElementById(id);
    if (el) el.classList.toggle('visible', visible);
}

// Loading indicators and failures follow server events
function subscribeEvents() {
    const events = new EventSource(API_BASE + '/api/events');
    events.addEventListener('loading_started', e => setLoading(JSON.parse(e.data).widget, true));
    events.addEventListener('loading_finished', e => setLoading(JSON.parse(e.data).widget, false));
    events.addEventListener('load_failed', e => {
        const event = JSON.parse(e.data);
        showError(`Błąd ładowania: ${event.error}`);
    });
}

function renderCard(reading) {
    const m = reading.measurement;
    return `
        <div class="card">
            <h2>${reading.sensor.room}</h2>
            <div id="latest-loading-${reading.sensor.id}" class="loading">Ładowanie...</div>
            <table>
                <tr><td>Temperatura [°C]</td><td>${m.temperature}</td></tr>
                <tr><td>Wilgotność [%]</td><td>${m.humidity}</td></tr>
                <tr><td>Napięcie baterii [V]</td><td>${m.voltage}</td></tr>
                <tr><td>Czas</td><td>${formatTime(m.timestamp)}</td></tr>
            </table>
        </div>`;
}

async function loadLatest() {
    try {
        const readings = await api('/api/latest');
        document.getElementById('latest-cards').innerHTML = readings.map(renderCard).join('');
    } catch (err) {
        showError(`Nie udało się pobrać pomiarów: ${err.message}`);
    }
}

function appendRows(measurements) {
    const tbody = document.getElementById('measurements');
    tbody.insertAdjacentHTML('beforeend', measurements.map(m => `
        <tr>
            <td>${formatTime(m.timestamp)}</td>
            <td>${state.rooms[m.id] || m.id}</td>
            <td>${m.temperature}</td>
            <td>${m.humidity}</td>
        </tr>`).join(''));
}

function halt(err) {
    state.halted = true;
    document.getElementById('load-more').disabled = true;
    showError(`Przeglądanie przerwane: ${err.message}`);
}

async function openExplore() {
    if (state.session || state.halted) return;
    document.getElementById('header-text').textContent = 'Ładowanie...';
    try {
        const page = await api('/api/explore?view=table', { method: 'POST' });
        state.session = page.session_id;
        appendRows(page.appended);
        await renderChart();
    } catch (err) {
        halt(err);
    } finally {
        document.getElementById('header-text').textContent = 'Pomiary';
    }
}

async function loadMore() {
    if (!state.session || state.halted) return;
    const button = document.getElementById('load-more');
    button.disabled = true;
    try {
        const page = await api(`/api/explore/${state.session}/more`, { method: 'POST' });
        appendRows(page.appended);
        await renderChart();
        button.disabled = false;
    } catch (err) {
        halt(err);
    }
}

async function renderChart() {
    const sensor = document.getElementById('chart-sensor').value;
    const metric = document.getElementById('chart-metric').value;
    if (!state.session || !sensor) return;

    const area = document.getElementById('chart-area');
    try {
        const chart = await api(`/api/explore/${state.session}/chart?sensor=${encodeURIComponent(sensor)}&metric=${metric}`);
        area.className = '';
        area.innerHTML = `<img class="chart-image" src="${chart.image}" width="${chart.width}" height="${chart.height}" alt="${state.rooms[sensor]}">`;
    } catch (err) {
        showError(`Nie udało się narysować wykresu: ${err.message}`);
    }
}

function toggleView() {
    const exploring = state.view === 'home';
    state.view = exploring ? 'explore' : 'home';
    document.getElementById('home-view').classList.toggle('hidden', exploring);
    document.getElementById('explore-view').classList.toggle('hidden', !exploring);
    document.getElementById('toggle-view').textContent = exploring ? 'Powrót' : 'Przeglądaj pomiary';
    if (exploring) openExplore();
}

async function init() {
    subscribeEvents();

    try {
        state.sensors = await api('/api/sensors');
    } catch (err) {
        showError(`Nie udało się pobrać listy czujników: ${err.message}`);
        return;
    }
    state.sensors.forEach(s => { state.rooms[s.id] = s.room; });
    document.getElementById('chart-sensor').innerHTML = state.sensors
        .map(s => `<option value="${s.id}">${s.room}</option>`)
        .join('');

    document.getElementById('toggle-view').addEventListener('click', toggleView);
    document.getElementById('load-more').addEventListener('click', loadMore);
    document.getElementById('chart-refresh').addEventListener('click', renderChart);
    document.getElementById('chart-sensor').addEventListener('change', renderChart);
    document.getElementById('chart-metric').addEventListener('change', renderChart);

    await loadLatest();
}

init();
</script>
</body>
</html>
"##;
