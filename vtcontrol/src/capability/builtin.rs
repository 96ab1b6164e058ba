//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! Descriptions of the terminal families the server knows how to drive.

/// Terminfo source for the built-in families.
pub(super) const SOURCE: &str = r"
# ANSI.SYS and the DOS terminal programs that copied it.
ansi|ansi/pc-term compatible with color,
	am, cols#80, lines#24, colors#8,
	clear=\E[2J\E[H, cup=\E[%i%p1%d;%p2%dH,
	sc=\E[s, rc=\E[u, svattr=\E7, rsattr=\E8,
	smam=\E[?7h, rmam=\E[?7l,
	scrmode=\E[=%p1%dh,
	is2=\E[0m,

# BBS clients reporting ansi that also negotiate their window size.
ansi-bbs|ANSI BBS client with window size reporting,
	lines#25,
	smkx=\E[?1h\E=,
	is2=\E[0m\E[?7h,
	use=ansi,

vt100|vt102|vt220|dec vt100 compatible,
	am, xon, cols#80, lines#24,
	clear=\E[H\E[J, cup=\E[%i%p1%d;%p2%dH,
	sc=\E7, rc=\E8, svattr=\E7, rsattr=\E8,
	smam=\E[?7h, rmam=\E[?7l,
	smkx=\E[?1h\E=,
	is2=\E[r\E[m\E[?7h\E[?1;3;4;6l\E[4l,

xterm|xterm-color|xterm-256color|xterm terminal emulator,
	colors#8,
	clear=\E[H\E[2J,
	is2=\E[!p\E[?3;4l\E[4l\E>,
	use=vt100,

linux|linux console,
	colors#8,
	is2@,
	use=vt100,
";
