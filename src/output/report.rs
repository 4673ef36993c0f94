use crate::page::Page;

/// Binds the elements marked with `data-controller`; a global flag stops a second bind.
pub const CLIENT_RUNTIME: &str = r#"
(function () {
  if (window.__carcompareBound) {
    return;
  }
  window.__carcompareBound = true;

  function marked(name) {
    return Array.prototype.slice.call(
      document.querySelectorAll('[data-controller~="' + name + '"]')
    );
  }

  marked('smooth-scroll').forEach(function (link) {
    link.addEventListener('click', function (e) {
      e.preventDefault();
      var id = link.getAttribute('href').substring(1);
      var target = id ? document.getElementById(id) : null;
      if (target) {
        target.scrollIntoView({ behavior: 'smooth', block: 'start' });
      }
    });
  });

  var toggle = marked('menu-toggle')[0];
  var menu = marked('menu')[0];
  if (toggle && menu) {
    var closeMenu = function () {
      toggle.classList.remove('active');
      menu.classList.remove('active');
    };
    toggle.addEventListener('click', function () {
      toggle.classList.toggle('active');
      menu.classList.toggle('active');
    });
    marked('menu-link').forEach(function (link) {
      link.addEventListener('click', closeMenu);
    });
    document.addEventListener('click', function (e) {
      if (!toggle.contains(e.target) && !menu.contains(e.target)) {
        closeMenu();
      }
    });
  }

  var headers = marked('accordion');
  var cards = headers.map(function (h) { return h.parentElement; });
  headers.forEach(function (header) {
    header.addEventListener('click', function (e) {
      e.preventDefault();
      e.stopPropagation();
      var card = header.parentElement;
      var wasActive = card.classList.contains('active');
      cards.forEach(function (c) { c.classList.remove('active'); });
      if (!wasActive) {
        card.classList.add('active');
      }
    });
  });
})();
"#;

pub fn render_html(page: &Page) -> Vec<u8> {
    page.to_html().into_bytes()
}
