//! Embedded pages and stylesheet.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>School Locator</title>
  <link rel="stylesheet" href="/style.css">
</head>
<body>
  <header><a href="/" class="brand">School Locator</a></header>
  <main>
    <h1>Find schools near you</h1>
    <p>Register schools with their coordinates, then list them by distance from any point.</p>
    <ul class="actions">
      <li><a href="/schools">Find schools</a></li>
      <li><a href="/schools/new">Add a school</a></li>
    </ul>
    <h2>JSON API</h2>
    <table>
      <tr><th>Request</th><th>Result</th></tr>
      <tr><td><code>GET /api/schools?latitude=&amp;longitude=</code></td><td>All schools, nearest first, with <code>distance</code> in km</td></tr>
      <tr><td><code>POST /api/schools</code></td><td>Register <code>{name, address, latitude, longitude}</code></td></tr>
      <tr><td><code>GET /api/schools/{id}</code></td><td>One school</td></tr>
    </table>
  </main>
</body>
</html>
"#;

pub const NOT_FOUND_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Not found | School Locator</title>
  <link rel="stylesheet" href="/style.css">
</head>
<body>
  <header><a href="/" class="brand">School Locator</a></header>
  <main>
    <h1>404</h1>
    <p>That page does not exist. <a href="/">Back to the start</a>.</p>
  </main>
</body>
</html>
"#;

pub const STYLE_CSS: &str = r#"* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; color: #1f2933; background: #f7f9fb; }
header { padding: 0.75rem 1.5rem; background: #1d4ed8; }
header .brand { color: #fff; font-weight: 600; text-decoration: none; }
main { max-width: 56rem; margin: 2rem auto; padding: 0 1.5rem; }
form { display: grid; gap: 0.75rem; max-width: 28rem; margin-bottom: 1.5rem; }
label { display: grid; gap: 0.25rem; font-size: 0.9rem; }
input { padding: 0.5rem; border: 1px solid #cbd2d9; border-radius: 4px; }
button { padding: 0.6rem; border: 0; border-radius: 4px; background: #1d4ed8; color: #fff; cursor: pointer; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th, td { padding: 0.5rem 0.75rem; border-bottom: 1px solid #e4e7eb; text-align: left; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
.error { padding: 0.75rem; border-left: 4px solid #dc2626; background: #fef2f2; }
.notice { padding: 0.75rem; border-left: 4px solid #16a34a; background: #f0fdf4; }
.actions { display: flex; gap: 1rem; list-style: none; padding: 0; }
"#;
