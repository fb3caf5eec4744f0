// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tera templates for the C++ artifacts.
//!
//! Tera keeps the newline after a tag, so loop bodies start right after the
//! opening tag and `{% endfor %}` sits at the start of the following line.

pub(crate) const INTERFACE_NAME: &str = "interface";
pub(crate) const LOGIC_NAME: &str = "logic";
pub(crate) const COLORS_HEADER_NAME: &str = "colors_header";
pub(crate) const COLORS_SOURCE_NAME: &str = "colors_source";

pub(crate) const INTERFACE: &str = r#"// Generated by lazylink-gen. Do not edit.
#pragma once
{% for header in includes %}#include "{{ header }}"
{% endfor %}
struct {{ wrapper }} {
  {{ wrapper }}(const char* so);
  ~{{ wrapper }}();
  {{ wrapper }}(const {{ wrapper }}&) = delete;
  {{ wrapper }}& operator=(const {{ wrapper }}&) = delete;
  void* dlhdl = nullptr;
{% for api in apis %}  typedef {{ api.return_type }} (*{{ api.name }}_type)({{ api.arguments }});
  {{ api.name }}_type {{ api.name }} = nullptr;
{% endfor %}};
"#;

pub(crate) const LOGIC: &str = r#"// Generated by lazylink-gen. Do not edit.
#include "{{ interface_include }}"
#include <dlfcn.h>

{{ wrapper }}::{{ wrapper }}(const char* so) {
  dlhdl = dlopen(so, RTLD_LAZY | RTLD_LOCAL | RTLD_NODELETE);
  if (dlhdl == nullptr) return;
{% for api in apis %}  this->{{ api.name }} = reinterpret_cast<{{ api.name }}_type>(dlsym(dlhdl, "{{ api.name }}"));
{% endfor %}}

{{ wrapper }}::~{{ wrapper }}() {
  if (dlhdl) dlclose(dlhdl);
}
"#;

pub(crate) const COLORS_HEADER: &str = r#"// Generated by lazylink-gen. Do not edit.
#pragma once
enum class ColorID : short {unused, {{ names | join(sep=",") }}};
void InitColors();
"#;

pub(crate) const COLORS_SOURCE: &str = r#"// Generated by lazylink-gen. Do not edit.
#include "{{ header_include }}"
#include <curses.h>
void InitColors() {
const short COLOR_DEFAULT = -1;
{% for color in colors %}init_pair(static_cast<short>(ColorID::{{ color.name }}), COLOR_{{ color.foreground }}, COLOR_{{ color.background }});
{% endfor %}}
"#;
