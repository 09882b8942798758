//! 터미널 출력 포맷팅 유틸리티
//!
//! 서버 기동 단계(인프라 연결, 레지스트리 구성)를 눈에 띄게 출력합니다.

const BOX_WIDTH: usize = 50;

/// 박스 형태로 둘러싸인 제목을 출력합니다
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║               MEMBER AUTH SERVICE                ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn print_boxed_title(title: &str) {
    for line in boxed_title(title) {
        println!("{}", line);
    }
}

fn boxed_title(title: &str) -> [String; 3] {
    let border = "═".repeat(BOX_WIDTH);
    [
        format!("╔{}╗", border),
        format!("║{:^width$}║", title, width = BOX_WIDTH),
        format!("╚{}╝", border),
    ]
}

/// `→ Step 1: MongoDB 연결`
pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

/// `✓ Step 1: MongoDB 연결 (2 items)`
pub fn print_step_complete(step: u8, description: &str, count: usize) {
    println!("✓ Step {}: {} ({} items)", step, description, count);
}

/// 하위 작업 상태를 트리 형태로 출력합니다
pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

/// 레지스트리 구성 요약
///
/// ```text
///    📦 Stores: 3
///    🔧 Services: 6
///    🔑 OAuth Providers: GOOGLE, KAKAO
/// ```
pub fn print_registry_summary(stores: usize, services: usize, providers: &[String]) {
    println!();
    print_boxed_title("🎉 SERVICE REGISTRY INITIALIZED");
    println!("   📦 Stores: {}", stores);
    println!("   🔧 Services: {}", services);
    if providers.is_empty() {
        println!("   🔑 OAuth Providers: (none)");
    } else {
        println!("   🔑 OAuth Providers: {}", providers.join(", "));
    }
    println!();
}
