//! SQLite schema for the reference drug dataset.
//!
//! The table and column names follow the reference dataset's own naming.
//! The engine only ever reads these tables; `SCHEMA` exists so a dataset
//! export (or a test fixture) can be loaded into a fresh SQLite file.

/// Reference dataset schema.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Drug catalog
-- ============================================================================

-- Labelers (manufacturers)
CREATE TABLE IF NOT EXISTS RLBLRCA1 (
    ILBLRID INTEGER PRIMARY KEY,
    MFG TEXT NOT NULL
);

-- Ingredient sequence -> ingredient class
CREATE TABLE IF NOT EXISTS RGCNSEQ4 (
    GCN_SEQNO INTEGER PRIMARY KEY,
    HICL_SEQNO INTEGER NOT NULL
);

-- Marketed drugs, one row per drug identification number
CREATE TABLE IF NOT EXISTS RICAIDC1 (
    DIN INTEGER PRIMARY KEY,
    LN TEXT NOT NULL,                            -- label name, fixed width
    GCN_SEQNO INTEGER NOT NULL REFERENCES RGCNSEQ4(GCN_SEQNO),
    ILBLRID INTEGER NOT NULL REFERENCES RLBLRCA1(ILBLRID),
    IADDDTE TEXT,
    IOBSDTE TEXT
);

CREATE INDEX IF NOT EXISTS idx_ricaidc1_ln ON RICAIDC1(LN);
CREATE INDEX IF NOT EXISTS idx_ricaidc1_gcn ON RICAIDC1(GCN_SEQNO);
CREATE INDEX IF NOT EXISTS idx_rgcnseq4_hicl ON RGCNSEQ4(HICL_SEQNO);

-- ============================================================================
-- Drug-drug interactions
-- ============================================================================

-- Ingredient sequence -> interaction code
CREATE TABLE IF NOT EXISTS RADIMGC4 (
    GCN_SEQNO INTEGER NOT NULL,
    DDI_CODEX INTEGER NOT NULL,
    PRIMARY KEY (GCN_SEQNO, DDI_CODEX)
);

-- Interaction code -> monograph and severity
CREATE TABLE IF NOT EXISTS RADIMMA5 (
    DDI_CODEX INTEGER PRIMARY KEY,
    DDI_MONOX INTEGER NOT NULL,
    DDI_DES TEXT,
    DDI_SL TEXT NOT NULL
);

-- Interaction code -> clinical effect code
CREATE TABLE IF NOT EXISTS RADIMIE4 (
    DDI_CODEX INTEGER NOT NULL,
    ADI_EFFTC TEXT NOT NULL,
    PRIMARY KEY (DDI_CODEX, ADI_EFFTC)
);

-- Clinical effect text
CREATE TABLE IF NOT EXISTS RADIMEF0 (
    ADI_EFFTC TEXT PRIMARY KEY,
    ADI_EFFTXT TEXT NOT NULL                     -- fixed width
);

-- Severity levels
CREATE TABLE IF NOT EXISTS RADIMSL1 (
    DDI_SL TEXT PRIMARY KEY,
    DDI_SLSD TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_radimma5_monox ON RADIMMA5(DDI_MONOX);

-- ============================================================================
-- Drug-food interactions
-- ============================================================================

CREATE TABLE IF NOT EXISTS RDFIMGC0 (
    GCN_SEQNO INTEGER NOT NULL,
    FDCDE INTEGER NOT NULL,
    PRIMARY KEY (GCN_SEQNO, FDCDE)
);

CREATE TABLE IF NOT EXISTS RDFIMMA0 (
    FDCDE INTEGER PRIMARY KEY,
    RESULT TEXT NOT NULL                         -- fixed width
);

-- ============================================================================
-- Drug-allergy interactions
-- ============================================================================

-- Allergen groups
CREATE TABLE IF NOT EXISTS RDAMAGD1 (
    DAM_ALRGN_GRP INTEGER PRIMARY KEY,
    DAM_ALRGN_GRP_DESC TEXT NOT NULL
);

-- Allergen group -> hierarchical ingredient
CREATE TABLE IF NOT EXISTS RDAMGHC0 (
    DAM_ALRGN_GRP INTEGER NOT NULL,
    HIC_SEQN INTEGER NOT NULL,
    PRIMARY KEY (DAM_ALRGN_GRP, HIC_SEQN)
);

-- Ingredient class -> hierarchical ingredient
CREATE TABLE IF NOT EXISTS RHICL1 (
    HICL_SEQNO INTEGER NOT NULL,
    HIC_SEQN INTEGER NOT NULL,
    HIC TEXT,
    PRIMARY KEY (HICL_SEQNO, HIC_SEQN)
);

-- Hierarchical ingredient descriptions
CREATE TABLE IF NOT EXISTS RHICD5 (
    HIC_SEQN INTEGER PRIMARY KEY,
    HIC_DESC TEXT
);
"#;

/// Tables every reference dataset must contain.
pub const REQUIRED_TABLES: &[&str] = &[
    "RADIMEF0", "RADIMGC4", "RADIMIE4", "RADIMMA5", "RADIMSL1", "RDAMAGD1", "RDAMGHC0",
    "RDFIMGC0", "RDFIMMA0", "RGCNSEQ4", "RHICD5", "RHICL1", "RICAIDC1", "RLBLRCA1",
];
